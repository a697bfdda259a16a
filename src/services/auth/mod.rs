//! 외부 프로바이더 인증 서비스 모듈
//!
//! OAuth 콜백 처리와 세션 인증 상태 변경을 담당합니다.
//!
//! # Features
//!
//! - [`hybridauth_app`] - `auth`/`attach` 동작과 리다이렉트 대상 계산
//! - [`oauth_engine`] - Authorization Code 교환 및 userinfo 조회
//! - [`oauth_state_store`] - 일회용 OAuth state (CSRF 방지)
//! - [`session_authority`] - Redis 세션 인증/로그아웃
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::auth::{HybridauthApp, RedisSessionAuthority};
//!
//! let previous = RedisSessionAuthority::for_session(redis.clone(), old_sid, ttl);
//! let fresh = RedisSessionAuthority::for_session(redis, new_sid, ttl);
//! let target = app.auth(&profile, &state.redirect, Some(&previous), &fresh).await?;
//! ```

pub mod hybridauth_app;
pub mod oauth_engine;
pub mod oauth_state_store;
pub mod session_authority;

pub use hybridauth_app::HybridauthApp;
pub use oauth_engine::{OAuthEngine, OidcEngine};
pub use oauth_state_store::OAuthStateStore;
pub use session_authority::{RedisSessionAuthority, SessionAuthority};
