//! User Entity Implementation
//!
//! 로컬 사용자 계정 엔티티입니다.
//! 사용자 관리 자체는 별도 서브시스템의 책임이며, 이 서비스는 외부 로그인으로
//! 처음 들어온 사용자를 자동 가입시킬 때만 계정을 생성합니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use crate::domain::entities::users::group::Group;

/// 사용자 엔티티 (`users` 컬렉션)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// 생성 시점에 클라이언트에서 할당되므로, 저장 전에도 IdentityLink가 참조할 수 있습니다.
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// 로그인명 (unique)
    pub login: String,
    /// 표시 이름
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// 비밀번호 해시. 빈 문자열이면 비밀번호 로그인이 불가능한 페더레이션 전용 계정입니다.
    pub password_hash: String,
    /// 소속 그룹 ID 목록
    pub groups: Vec<ObjectId>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl User {
    /// 사용할 수 없는 비밀번호 해시 값
    pub const FEDERATED_PASSWORD_HASH: &'static str = "";

    /// 외부 로그인으로 자동 가입되는 사용자 생성
    pub fn new_federated(login: String, display_name: String, email: Option<String>, group: &Group) -> Self {
        let now = DateTime::now();

        Self {
            id: ObjectId::new(),
            login,
            display_name,
            email,
            password_hash: Self::FEDERATED_PASSWORD_HASH.to_string(),
            groups: vec![group.id],
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id_string(&self) -> String {
        self.id.to_hex()
    }

    /// 비밀번호 인증이 가능한 사용자인지 확인
    pub fn can_authenticate_with_password(&self) -> bool {
        self.password_hash != Self::FEDERATED_PASSWORD_HASH
    }
}
