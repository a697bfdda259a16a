//! # 세션 권한 어댑터
//!
//! 해석된 사용자로 현재 세션을 인증하거나 로그아웃시키는 경계입니다.
//! 요청마다 세션 ID(`hybridauth_sid` 쿠키)에 묶인 인스턴스를 만들어 사용합니다.
//!
//! ## Redis 키
//!
//! ```text
//! session:{sid} → SessionRecord (JSON, TTL = SESSION_TTL_SECONDS)
//! ```

use async_trait::async_trait;
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use crate::{
    caching::redis::RedisClient,
    core::errors::{AppError, AppResult},
    domain::{
        entities::users::User,
        models::auth::{AuthContext, SessionRecord},
    },
};

/// 세션 인증 상태를 변경하는 협력자
#[async_trait]
pub trait SessionAuthority: Send + Sync {
    /// 세션을 `user`로 인증된 상태로 만듭니다.
    async fn set_authorized(&self, user: &User, context: &AuthContext) -> AppResult<()>;

    /// 세션의 인증 상태를 제거합니다.
    async fn logout(&self) -> AppResult<()>;
}

/// Redis 기반 세션 권한
pub struct RedisSessionAuthority {
    redis: RedisClient,
    session_id: String,
    ttl_seconds: u64,
}

impl RedisSessionAuthority {
    pub fn for_session(redis: RedisClient, session_id: impl Into<String>, ttl_seconds: u64) -> Self {
        Self {
            redis,
            session_id: session_id.into(),
            ttl_seconds,
        }
    }

    fn key(&self) -> String {
        format!("session:{}", self.session_id)
    }

    /// 현재 세션 레코드
    pub async fn current(&self) -> AppResult<Option<SessionRecord>> {
        Ok(self.redis.get::<SessionRecord>(&self.key()).await?)
    }

    /// 인증된 세션의 사용자 ID
    ///
    /// 세션이 없거나 만료되었으면 `None`입니다.
    pub async fn current_user_id(&self) -> AppResult<Option<ObjectId>> {
        let Some(record) = self.current().await? else {
            return Ok(None);
        };

        ObjectId::parse_str(&record.user_id)
            .map(Some)
            .map_err(|e| AppError::AuthenticationError(format!("잘못된 세션 사용자 ID: {}", e)))
    }
}

#[async_trait]
impl SessionAuthority for RedisSessionAuthority {
    async fn set_authorized(&self, user: &User, context: &AuthContext) -> AppResult<()> {
        let record = SessionRecord {
            user_id: user.id_string(),
            context: context.clone(),
            authorized_at: Utc::now().timestamp(),
        };

        self.redis
            .set_with_expiry(&self.key(), &record, self.ttl_seconds)
            .await?;

        log::debug!("세션 인증: sid={}, user={}", self.session_id, record.user_id);
        Ok(())
    }

    async fn logout(&self) -> AppResult<()> {
        self.redis.del(&self.key()).await?;
        log::debug!("세션 로그아웃: sid={}", self.session_id);
        Ok(())
    }
}
