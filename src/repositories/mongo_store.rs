//! # MongoDB 식별 정보 저장소
//!
//! 사용자 리포지토리와 IdentityLink 리포지토리를 묶고,
//! 자동 가입 시 두 컬렉션에 걸친 트랜잭션을 수행합니다.

use std::{sync::Arc, time::Duration};
use async_trait::async_trait;
use mongodb::{
    bson::oid::ObjectId,
    error::{ErrorKind, WriteFailure, TRANSIENT_TRANSACTION_ERROR},
};
use crate::{
    core::errors::{AppError, AppResult},
    db::Database,
    domain::entities::{identity::IdentityLink, users::{Group, User}},
    repositories::{
        identity::MongoIdentityLinkRepository,
        users::MongoUserRepository,
        IdentityLinkRepository, IdentityStore, UserRepository,
    },
};

/// MongoDB 유니크 인덱스 위반 에러 코드
pub const DUPLICATE_KEY_CODE: i32 = 11000;

/// 트랜잭션 간 쓰기 충돌 에러 코드 (WriteConflict)
pub const WRITE_CONFLICT_CODE: i32 = 112;

/// 일시적 트랜잭션 실패 시 전체 트랜잭션을 다시 시도하는 최대 횟수
const MAX_REGISTRATION_ATTEMPTS: u32 = 3;

const RETRY_BACKOFF_MILLIS: u64 = 50;

fn error_code(error: &mongodb::error::Error) -> Option<i32> {
    match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => Some(write_error.code),
        ErrorKind::Write(WriteFailure::WriteConcernError(concern_error)) => Some(concern_error.code),
        ErrorKind::Command(command_error) => Some(command_error.code),
        _ => None,
    }
}

/// E11000 (duplicate key) 여부
pub fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    error_code(error) == Some(DUPLICATE_KEY_CODE)
}

/// 전체 트랜잭션을 다시 시도하면 해소될 수 있는 실패인지 여부
///
/// 아직 커밋되지 않은 다른 가입 트랜잭션과 같은 `(provider, external_id)`를 쓰면
/// 서버는 E11000이 아니라 WriteConflict(112)와 `TransientTransactionError` 레이블로 거부합니다.
pub fn is_transient_conflict(error: &mongodb::error::Error) -> bool {
    error_code(error) == Some(WRITE_CONFLICT_CODE) || error.contains_label(TRANSIENT_TRANSACTION_ERROR)
}

/// 가입 트랜잭션의 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RegistrationStep {
    Begin,
    InsertUser,
    InsertLink,
    Commit,
}

impl RegistrationStep {
    fn describe(self) -> &'static str {
        match self {
            RegistrationStep::Begin => "트랜잭션 시작",
            RegistrationStep::InsertUser => "사용자 저장",
            RegistrationStep::InsertLink => "IdentityLink 저장",
            RegistrationStep::Commit => "트랜잭션 커밋",
        }
    }
}

/// 실패한 가입 시도를 어떻게 처리할지
#[derive(Debug, PartialEq, Eq)]
enum RegistrationOutcome {
    Retry,
    Duplicate,
    Failed,
}

/// 단계와 에러, 시도 횟수로 가입 실패의 처리 방식을 정합니다.
///
/// - 링크 삽입/커밋의 E11000은 경합에서 진 것이므로 `Duplicate`
/// - 일시적 충돌은 시도 횟수가 남아 있으면 `Retry`, 다 쓰면 `Duplicate`
/// - 사용자 삽입의 E11000(로그인 충돌)을 포함한 나머지는 `Failed`
fn classify_failure(step: RegistrationStep, error: &mongodb::error::Error, attempt: u32) -> RegistrationOutcome {
    if is_transient_conflict(error) {
        return if attempt < MAX_REGISTRATION_ATTEMPTS {
            RegistrationOutcome::Retry
        } else {
            RegistrationOutcome::Duplicate
        };
    }

    match step {
        RegistrationStep::InsertLink | RegistrationStep::Commit if is_duplicate_key(error) => RegistrationOutcome::Duplicate,
        _ => RegistrationOutcome::Failed,
    }
}

/// MongoDB 기반 [`IdentityStore`]
#[derive(Clone)]
pub struct MongoIdentityStore {
    db: Arc<Database>,
    users: MongoUserRepository,
    links: MongoIdentityLinkRepository,
}

impl MongoIdentityStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            users: MongoUserRepository::new(db.clone()),
            links: MongoIdentityLinkRepository::new(db.clone()),
            db,
        }
    }

    /// 모든 컬렉션의 인덱스를 생성합니다.
    pub async fn create_indexes(&self) -> AppResult<()> {
        self.users.create_indexes().await?;
        self.links.create_indexes().await?;
        log::info!("✅ 인덱스 생성 완료: users, groups, hybridauth");
        Ok(())
    }

    async fn insert_registration(&self, user: &User, link: &IdentityLink) -> AppResult<()> {
        let mut attempt = 1;

        loop {
            let Err((step, error)) = self.try_registration(user, link).await else {
                return Ok(());
            };

            match classify_failure(step, &error, attempt) {
                RegistrationOutcome::Retry => {
                    log::warn!(
                        "가입 트랜잭션 충돌, 재시도 {}/{}: provider={}, external_id={}, step={}",
                        attempt, MAX_REGISTRATION_ATTEMPTS, link.provider, link.external_id, step.describe()
                    );
                    actix_web::rt::time::sleep(Duration::from_millis(RETRY_BACKOFF_MILLIS * attempt as u64)).await;
                    attempt += 1;
                }
                RegistrationOutcome::Duplicate => {
                    return Err(AppError::DuplicateIdentity {
                        provider: link.provider.clone(),
                        external_id: link.external_id.clone(),
                    });
                }
                RegistrationOutcome::Failed => {
                    return Err(AppError::PersistenceFailure(format!("{} 실패: {}", step.describe(), error)));
                }
            }
        }
    }

    /// 사용자와 링크를 한 트랜잭션으로 삽입합니다. 실패하면 트랜잭션을 중단하고 실패 단계를 돌려줍니다.
    async fn try_registration(
        &self,
        user: &User,
        link: &IdentityLink,
    ) -> Result<(), (RegistrationStep, mongodb::error::Error)> {
        let mut session = self.db.client().start_session().await
            .map_err(|e| (RegistrationStep::Begin, e))?;
        session.start_transaction().await
            .map_err(|e| (RegistrationStep::Begin, e))?;

        if let Err(e) = self.users.insert_in_session(user, &mut session).await {
            let _ = session.abort_transaction().await;
            return Err((RegistrationStep::InsertUser, e));
        }

        if let Err(e) = self.links.insert_in_session(link, &mut session).await {
            let _ = session.abort_transaction().await;
            return Err((RegistrationStep::InsertLink, e));
        }

        session.commit_transaction().await
            .map_err(|e| (RegistrationStep::Commit, e))
    }
}

#[async_trait]
impl IdentityLinkRepository for MongoIdentityStore {
    async fn find_by_provider_and_id(&self, provider: &str, external_id: &str) -> AppResult<Option<IdentityLink>> {
        self.links.find_by_provider_and_id(provider, external_id).await
    }

    async fn save(&self, link: &IdentityLink) -> AppResult<()> {
        IdentityLinkRepository::save(&self.links, link).await
    }
}

#[async_trait]
impl UserRepository for MongoIdentityStore {
    async fn find_group_by_name(&self, name: &str) -> AppResult<Option<Group>> {
        self.users.find_group_by_name(name).await
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<User>> {
        self.users.find_by_id(id).await
    }

    async fn save(&self, user: &User) -> AppResult<()> {
        UserRepository::save(&self.users, user).await
    }
}

#[async_trait]
impl IdentityStore for MongoIdentityStore {
    /// `users`와 `hybridauth`에 대한 다중 문서 트랜잭션
    ///
    /// 세션/트랜잭션 시작 실패(예: standalone 서버)는 `PersistenceFailure`로 보고됩니다.
    /// 다른 가입과의 쓰기 충돌은 트랜잭션 전체를 재시도하며, 끝내 해소되지 않으면 `DuplicateIdentity`입니다.
    async fn save_registration(&self, user: &User, link: &IdentityLink) -> AppResult<()> {
        self.insert_registration(user, link).await
    }
}
