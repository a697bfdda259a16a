//! # 사용자 리포지토리 구현
//!
//! `users`, `groups` 컬렉션에 대한 MongoDB 데이터 액세스입니다.
//!
//! ## 특징
//!
//! - **클라이언트 할당 ID**: `_id`는 엔티티 생성 시 정해지므로 저장은 ID 기준 upsert
//! - **세션 지원**: 자동 가입 트랜잭션에서 [`MongoUserRepository::insert_in_session`] 사용
//! - **데이터 무결성**: `login`, 그룹 `name` 유니크 인덱스

use std::sync::Arc;
use async_trait::async_trait;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::IndexOptions,
    ClientSession, Collection, IndexModel,
};
use crate::{
    core::errors::{AppError, AppResult},
    db::Database,
    domain::entities::users::{Group, User},
    repositories::UserRepository,
};

/// MongoDB 사용자/그룹 리포지토리
///
/// ## 컬렉션
///
/// - **`users`**: 인덱스 `login`(unique), `created_at`(desc)
/// - **`groups`**: 인덱스 `name`(unique)
///
/// 그룹은 이 서비스가 만들지 않습니다. 자동 가입에 필요한 `Users` 그룹은
/// 사용자 관리 서브시스템(또는 운영자)이 미리 만들어 두어야 합니다.
#[derive(Clone)]
pub struct MongoUserRepository {
    db: Arc<Database>,
}

impl MongoUserRepository {
    pub const USERS_COLLECTION: &'static str = "users";
    pub const GROUPS_COLLECTION: &'static str = "groups";

    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn users(&self) -> Collection<User> {
        self.db.get_database().collection(Self::USERS_COLLECTION)
    }

    fn groups(&self) -> Collection<Group> {
        self.db.get_database().collection(Self::GROUPS_COLLECTION)
    }

    /// 진행 중인 트랜잭션 안에서 새 사용자를 삽입합니다.
    pub async fn insert_in_session(&self, user: &User, session: &mut ClientSession) -> Result<(), mongodb::error::Error> {
        self.users()
            .insert_one(user)
            .session(session)
            .await
            .map(|_| ())
    }

    /// 데이터베이스 인덱스 생성
    ///
    /// 애플리케이션 시작 시 한 번 실행합니다.
    /// 이미 중복 `login`이 있는 컬렉션에서는 유니크 인덱스 생성이 실패합니다.
    pub async fn create_indexes(&self) -> AppResult<()> {
        let login_index = IndexModel::builder()
            .keys(doc! { "login": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("login_unique".to_string())
                .build())
            .build();

        let created_at_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(IndexOptions::builder()
                .name("created_at_desc".to_string())
                .build())
            .build();

        self.users()
            .create_indexes([login_index, created_at_index])
            .await?;

        let group_name_index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("name_unique".to_string())
                .build())
            .build();

        self.groups().create_index(group_name_index).await?;

        Ok(())
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn find_group_by_name(&self, name: &str) -> AppResult<Option<Group>> {
        self.groups()
            .find_one(doc! { "name": name })
            .await
            .map_err(|e| AppError::PersistenceFailure(e.to_string()))
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<User>> {
        self.users()
            .find_one(doc! { "_id": *id })
            .await
            .map_err(|e| AppError::PersistenceFailure(e.to_string()))
    }

    async fn save(&self, user: &User) -> AppResult<()> {
        self.users()
            .replace_one(doc! { "_id": user.id }, user)
            .upsert(true)
            .await
            .map_err(|e| AppError::PersistenceFailure(e.to_string()))?;

        Ok(())
    }
}
