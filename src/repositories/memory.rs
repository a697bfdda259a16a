//! # 인메모리 식별 정보 저장소
//!
//! `STORAGE_BACKEND=memory`로 실행하거나 테스트에서 사용하는 [`IdentityStore`] 구현입니다.
//! 하나의 `Mutex` 아래에서 MongoDB 구현과 같은 유니크 제약을 검사합니다.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use crate::{
    core::errors::{AppError, AppResult},
    domain::entities::{identity::IdentityLink, users::{Group, User}},
    repositories::{IdentityLinkRepository, IdentityStore, UserRepository},
};

#[derive(Default)]
struct Tables {
    users: HashMap<ObjectId, User>,
    groups: HashMap<ObjectId, Group>,
    /// 자연 키 `(provider, external_id)` 기준
    links: HashMap<(String, String), IdentityLink>,
}

impl Tables {
    fn login_taken(&self, user: &User) -> bool {
        self.users
            .values()
            .any(|existing| existing.login == user.login && existing.id != user.id)
    }
}

/// 프로세스 메모리 기반 저장소
#[derive(Default)]
pub struct InMemoryIdentityStore {
    tables: Mutex<Tables>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 기본 `Users` 그룹이 준비된 저장소
    pub fn with_default_group() -> Self {
        let group = Group::new(Group::DEFAULT_NAME);
        let tables = Tables {
            groups: HashMap::from([(group.id, group)]),
            ..Tables::default()
        };
        Self { tables: Mutex::new(tables) }
    }

    pub fn insert_group(&self, group: Group) -> AppResult<()> {
        self.lock()?.groups.insert(group.id, group);
        Ok(())
    }

    pub fn users(&self) -> Vec<User> {
        self.lock()
            .map(|tables| tables.users.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn links(&self) -> Vec<IdentityLink> {
        self.lock()
            .map(|tables| tables.links.values().cloned().collect())
            .unwrap_or_default()
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| AppError::PersistenceFailure("인메모리 저장소 잠금 실패".to_string()))
    }
}

fn natural_key(provider: &str, external_id: &str) -> (String, String) {
    (provider.to_string(), external_id.to_string())
}

#[async_trait]
impl IdentityLinkRepository for InMemoryIdentityStore {
    async fn find_by_provider_and_id(&self, provider: &str, external_id: &str) -> AppResult<Option<IdentityLink>> {
        let tables = self.lock()?;
        Ok(tables.links.get(&natural_key(provider, external_id)).cloned())
    }

    async fn save(&self, link: &IdentityLink) -> AppResult<()> {
        let mut tables = self.lock()?;
        let key = natural_key(&link.provider, &link.external_id);

        match tables.links.get_mut(&key) {
            Some(existing) => {
                // upsert의 $set 대상만 갱신하고 _id, created_at은 유지
                existing.user_id = link.user_id;
                existing.display_name = link.display_name.clone();
                existing.avatar_url = link.avatar_url.clone();
                existing.profile_url = link.profile_url.clone();
                existing.updated_at = link.updated_at;
            }
            None => {
                tables.links.insert(key, link.clone());
            }
        }

        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryIdentityStore {
    async fn find_group_by_name(&self, name: &str) -> AppResult<Option<Group>> {
        let tables = self.lock()?;
        Ok(tables.groups.values().find(|group| group.name == name).cloned())
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<User>> {
        let tables = self.lock()?;
        Ok(tables.users.get(id).cloned())
    }

    async fn save(&self, user: &User) -> AppResult<()> {
        let mut tables = self.lock()?;

        if tables.login_taken(user) {
            return Err(AppError::PersistenceFailure(format!("이미 사용 중인 로그인명: {}", user.login)));
        }

        tables.users.insert(user.id, user.clone());
        Ok(())
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn save_registration(&self, user: &User, link: &IdentityLink) -> AppResult<()> {
        let mut tables = self.lock()?;

        // 모든 제약을 먼저 검사한 뒤 한 번에 기록
        if tables.login_taken(user) {
            return Err(AppError::PersistenceFailure(format!("이미 사용 중인 로그인명: {}", user.login)));
        }

        let key = natural_key(&link.provider, &link.external_id);
        if tables.links.contains_key(&key) {
            return Err(AppError::DuplicateIdentity {
                provider: link.provider.clone(),
                external_id: link.external_id.clone(),
            });
        }

        tables.users.insert(user.id, user.clone());
        tables.links.insert(key, link.clone());
        Ok(())
    }
}
