//! 데이터 액세스 계층
//!
//! 식별 정보 해석 로직이 의존하는 저장소 계약(trait)과 그 구현을 제공합니다.
//! 서비스는 구체 타입이 아니라 `Arc<dyn IdentityStore>`를 주입받습니다.
//!
//! # 구현체
//!
//! - [`mongo_store::MongoIdentityStore`] - MongoDB (`users`, `groups`, `hybridauth` 컬렉션)
//! - [`memory::InMemoryIdentityStore`] - 프로세스 메모리 (개발/테스트)
//!
//! # 원자성 규칙
//!
//! - `IdentityLinkRepository::save`는 자연 키 `(provider, external_id)` 기준 upsert 한 번으로 끝납니다.
//! - 자동 가입은 `IdentityStore::save_registration`이 사용자와 링크를 한 트랜잭션으로 저장합니다.
//! - 유니크 제약 위반은 애플리케이션 락이 아니라 저장소가 판정하며 `AppError::DuplicateIdentity`로 보고됩니다.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use crate::core::errors::AppResult;
use crate::domain::entities::identity::IdentityLink;
use crate::domain::entities::users::{Group, User};

pub mod users;
pub mod identity;
pub mod mongo_store;
pub mod memory;

/// `(provider, external_id) → 로컬 사용자` 매핑 저장소
#[async_trait]
pub trait IdentityLinkRepository: Send + Sync {
    /// 자연 키 정확 일치 조회
    async fn find_by_provider_and_id(&self, provider: &str, external_id: &str) -> AppResult<Option<IdentityLink>>;

    /// 자연 키 기준 insert 또는 update
    ///
    /// 같은 키로 동시에 처음 저장되는 경합에서 진 쪽은 `DuplicateIdentity`를 받습니다.
    async fn save(&self, link: &IdentityLink) -> AppResult<()>;
}

/// 로컬 사용자/그룹 저장소
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_group_by_name(&self, name: &str) -> AppResult<Option<Group>>;

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<User>>;

    /// ID 기준 insert 또는 update
    async fn save(&self, user: &User) -> AppResult<()>;
}

/// 식별 정보 해석에 필요한 저장소 전체
#[async_trait]
pub trait IdentityStore: IdentityLinkRepository + UserRepository {
    /// 새 사용자와 그 링크를 하나의 작업 단위로 저장합니다.
    ///
    /// 둘 다 저장되거나 둘 다 저장되지 않습니다.
    /// `(provider, external_id)`가 이미 존재하면 `DuplicateIdentity`를 반환하고 사용자도 남기지 않습니다.
    async fn save_registration(&self, user: &User, link: &IdentityLink) -> AppResult<()>;
}
