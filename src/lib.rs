//! 외부 인증 연동 서비스 백엔드
//!
//! 외부 OAuth2/OIDC 프로바이더로 검증된 신원을 로컬 사용자 계정에 연결하는 서비스입니다.
//! 처음 보는 외부 계정은 설정에 따라 자동 가입시키고, 로그인한 사용자는
//! 추가 프로바이더 계정을 자신의 계정에 연결(attach)할 수 있습니다.
//!
//! # Features
//!
//! - **로그인 해석**: `(provider, external_id)` → 로컬 사용자
//! - **자동 가입**: 사용자 + 링크를 하나의 트랜잭션으로 생성, 동시 가입 경합 복구
//! - **계정 연결**: 현재 사용자에게 외부 계정 연결 (last-write-wins)
//! - **세션**: Redis 기반 세션 인증/로그아웃
//! - **MongoDB**: 사용자/그룹/링크 영구 저장 (또는 인메모리 저장소)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← /hybridauth/{provider}/{method}, /hybridauth/callback
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← state 검증, 쿠키, 302 리다이렉트
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← HybridauthApp, IdentityResolver, OAuthEngine
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← IdentityStore (MongoDB / memory)
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ MongoDB + Redis │ ← 저장소
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use hybridauth_service::repositories::memory::InMemoryIdentityStore;
//! use hybridauth_service::services::identity::IdentityResolver;
//!
//! let store = Arc::new(InMemoryIdentityStore::with_default_group());
//! let resolver = IdentityResolver::new(store, true);
//!
//! let user = resolver.resolve_login(&profile).await?;
//! ```

pub mod core;
pub mod config;
pub mod db;
pub mod caching;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod utils;
pub mod routes;
pub mod handlers;
