//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! 모든 서비스는 생성자로 협력자를 주입받습니다 (`Arc<dyn Trait>` 또는 값 복사).
//!
//! # Modules
//!
//! - [`identity`] - 외부 식별 정보 → 로컬 사용자 해석
//! - [`auth`] - OAuth 흐름, 세션 인증, 리다이렉트 처리
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use crate::repositories::memory::InMemoryIdentityStore;
//! use crate::services::{auth::HybridauthApp, identity::IdentityResolver};
//!
//! let store = Arc::new(InMemoryIdentityStore::with_default_group());
//! let app = HybridauthApp::new(IdentityResolver::new(store, true));
//! ```

pub mod identity;
pub mod auth;
