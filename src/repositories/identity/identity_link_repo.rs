//! # IdentityLink 리포지토리 구현
//!
//! `hybridauth` 컬렉션에 대한 MongoDB 데이터 액세스입니다.
//! `(provider, external_id)` 복합 유니크 인덱스가 "외부 계정 하나당 로컬 사용자 하나" 규칙을 강제합니다.

use std::sync::Arc;
use async_trait::async_trait;
use mongodb::{
    bson::doc,
    options::IndexOptions,
    ClientSession, Collection, IndexModel,
};
use crate::{
    core::errors::{AppError, AppResult},
    db::Database,
    domain::entities::identity::IdentityLink,
    repositories::{mongo_store::is_duplicate_key, IdentityLinkRepository},
};

/// MongoDB IdentityLink 리포지토리
///
/// ## 저장 방식
///
/// `save`는 `_id`가 아닌 자연 키를 필터로 하는 `update_one` + `upsert`입니다.
/// `_id`와 `created_at`은 `$setOnInsert`로 처음 삽입될 때만 기록되므로,
/// 이미 존재하는 링크를 다른 요청이 먼저 만들었더라도 그 문서를 덮어쓰게 됩니다.
/// 두 요청이 동시에 "처음" 삽입하려 하면 유니크 인덱스가 한 쪽을 E11000으로 거부합니다.
#[derive(Clone)]
pub struct MongoIdentityLinkRepository {
    db: Arc<Database>,
}

impl MongoIdentityLinkRepository {
    pub const COLLECTION: &'static str = "hybridauth";

    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn links(&self) -> Collection<IdentityLink> {
        self.db.get_database().collection(Self::COLLECTION)
    }

    /// 진행 중인 트랜잭션 안에서 새 링크를 삽입합니다.
    pub async fn insert_in_session(&self, link: &IdentityLink, session: &mut ClientSession) -> Result<(), mongodb::error::Error> {
        self.links()
            .insert_one(link)
            .session(session)
            .await
            .map(|_| ())
    }

    /// `(provider, external_id)` 유니크 인덱스와 사용자별 조회 인덱스를 생성합니다.
    pub async fn create_indexes(&self) -> AppResult<()> {
        let natural_key_index = IndexModel::builder()
            .keys(doc! { "provider": 1, "external_id": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("provider_external_id_unique".to_string())
                .build())
            .build();

        let user_index = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .options(IndexOptions::builder()
                .name("user_id".to_string())
                .build())
            .build();

        self.links()
            .create_indexes([natural_key_index, user_index])
            .await?;

        Ok(())
    }
}

#[async_trait]
impl IdentityLinkRepository for MongoIdentityLinkRepository {
    async fn find_by_provider_and_id(&self, provider: &str, external_id: &str) -> AppResult<Option<IdentityLink>> {
        self.links()
            .find_one(doc! { "provider": provider, "external_id": external_id })
            .await
            .map_err(|e| AppError::PersistenceFailure(e.to_string()))
    }

    async fn save(&self, link: &IdentityLink) -> AppResult<()> {
        let filter = doc! {
            "provider": link.provider.as_str(),
            "external_id": link.external_id.as_str(),
        };
        let update = doc! {
            "$set": {
                "user_id": link.user_id,
                "display_name": link.display_name.as_str(),
                "avatar_url": link.avatar_url.clone(),
                "profile_url": link.profile_url.clone(),
                "updated_at": link.updated_at,
            },
            "$setOnInsert": {
                "_id": link.id,
                "created_at": link.created_at,
            },
        };

        match self.links().update_one(filter, update).upsert(true).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => Err(AppError::DuplicateIdentity {
                provider: link.provider.clone(),
                external_id: link.external_id.clone(),
            }),
            Err(e) => Err(AppError::PersistenceFailure(e.to_string())),
        }
    }
}
