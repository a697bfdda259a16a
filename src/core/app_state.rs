//! 애플리케이션 상태
//!
//! 시작 시 한 번 조립되어 모든 워커가 공유하는 협력자 묶음입니다.

use std::sync::Arc;
use crate::{
    caching::redis::RedisClient,
    repositories::IdentityStore,
    services::auth::{HybridauthApp, OAuthEngine, OAuthStateStore, RedisSessionAuthority},
};

#[derive(Clone)]
pub struct AppState {
    pub app: HybridauthApp,
    pub engine: Arc<dyn OAuthEngine>,
    pub states: OAuthStateStore,
    pub store: Arc<dyn IdentityStore>,
    pub redis: RedisClient,
    pub session_ttl_seconds: u64,
    /// 세션 쿠키에 `Secure` 속성을 붙일지 여부
    pub secure_cookies: bool,
}

impl AppState {
    /// 세션 ID에 묶인 세션 권한
    pub fn session(&self, session_id: &str) -> RedisSessionAuthority {
        RedisSessionAuthority::for_session(self.redis.clone(), session_id, self.session_ttl_seconds)
    }
}
