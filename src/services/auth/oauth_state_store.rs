//! 일회용 OAuth state 저장소
//!
//! 인증 시작 시 `{provider, method, redirect}`를 무작위 state 키로 저장하고,
//! 콜백에서 `GETDEL`로 한 번만 꺼냅니다. 재사용되거나 만료된 state는 거부됩니다.

use crate::{
    caching::redis::RedisClient,
    core::errors::{AppError, AppResult},
    domain::models::auth::OAuthStateRecord,
    utils::token::generate_opaque_id,
};

#[derive(Clone)]
pub struct OAuthStateStore {
    redis: RedisClient,
    ttl_seconds: u64,
}

impl OAuthStateStore {
    pub fn new(redis: RedisClient, ttl_seconds: u64) -> Self {
        Self { redis, ttl_seconds }
    }

    fn key(state: &str) -> String {
        format!("oauth_state:{}", state)
    }

    /// 레코드를 저장하고 프로바이더에 전달할 state 값을 반환합니다.
    pub async fn issue(&self, record: &OAuthStateRecord) -> AppResult<String> {
        let state = generate_opaque_id();
        self.redis
            .set_with_expiry(&Self::key(&state), record, self.ttl_seconds)
            .await?;
        Ok(state)
    }

    /// state에 해당하는 레코드를 꺼내고 삭제합니다.
    pub async fn consume(&self, state: &str) -> AppResult<OAuthStateRecord> {
        if state.trim().is_empty() {
            return Err(AppError::AuthenticationError("OAuth state가 없습니다".to_string()));
        }

        self.redis
            .take::<OAuthStateRecord>(&Self::key(state))
            .await?
            .ok_or_else(|| AppError::AuthenticationError("만료되었거나 이미 사용된 OAuth state".to_string()))
    }
}
