//! IdentityLink Entity
//!
//! `(provider, external_id)` 쌍을 로컬 사용자 한 명에게 연결하는 매핑입니다.
//! 한 사용자는 여러 프로바이더 링크를 가질 수 있지만, 링크는 항상 정확히 한 사용자에 속합니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use crate::domain::models::oauth::ExternalProfile;

/// 외부 계정 연결 엔티티 (`hybridauth` 컬렉션)
///
/// ## 생명주기
///
/// - **생성**: 해당 `(provider, external_id)`로 처음 로그인(자동 가입)하거나 attach할 때
/// - **갱신**: attach 시 캐시 필드 새로 고침 및 소유자 재지정
/// - **삭제**: 이 서비스에서는 삭제하지 않음 (관리 기능의 책임)
///
/// `display_name`, `avatar_url`, `profile_url`은 마지막으로 본 외부 프로필 값의 캐시입니다.
/// 일반 로그인에서는 갱신하지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityLink {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub provider: String,
    pub external_id: String,
    /// 연결된 로컬 사용자
    pub user_id: ObjectId,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl IdentityLink {
    /// 외부 프로필로부터 새 링크를 만들어 `user_id`에 연결합니다.
    pub fn new(profile: &ExternalProfile, user_id: ObjectId) -> Self {
        let now = DateTime::now();

        let mut link = Self {
            id: ObjectId::new(),
            provider: profile.provider.clone(),
            external_id: profile.external_id.clone(),
            user_id,
            display_name: String::new(),
            avatar_url: None,
            profile_url: None,
            created_at: now,
            updated_at: now,
        };
        link.refresh_from(profile);
        link
    }

    /// 캐시 필드를 최신 외부 프로필 값으로 덮어씁니다.
    ///
    /// 갱신 순서: avatar → profile URL → display name
    pub fn refresh_from(&mut self, profile: &ExternalProfile) {
        self.avatar_url = profile.photo_url.clone();
        self.profile_url = profile.profile_url.clone();
        self.display_name = profile.resolved_display_name().to_string();
        self.updated_at = DateTime::now();
    }

    /// 소유자를 `user_id`로 지정하고, 실제로 바뀌었다면 이전 소유자를 돌려줍니다.
    pub fn assign_owner(&mut self, user_id: ObjectId) -> Option<ObjectId> {
        if self.user_id == user_id {
            return None;
        }
        let previous = self.user_id;
        self.user_id = user_id;
        self.updated_at = DateTime::now();
        Some(previous)
    }
}
