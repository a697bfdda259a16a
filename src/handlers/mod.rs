//! # HTTP Request Handlers Module
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 정의하는 모듈입니다.
//! 핸들러는 `web::Data<AppState>`로 조립된 서비스를 받아 호출만 하고,
//! 비즈니스 규칙은 서비스 계층에 둡니다.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//!   Browser (302 redirect 기반 흐름)
//! └─────────────────────┬───────────────────────┘
//! ┌─────────────────────▼───────────────────────┐
//!   Handlers (이 모듈)                            ← Web Layer
//! ├─────────────────────────────────────────────┤
//!   HybridauthApp / IdentityResolver              ← Service Layer
//! ├─────────────────────────────────────────────┤
//!   IdentityStore                                 ← Repository Layer
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## 모듈 구성
//!
//! - **`hybridauth`**: 외부 프로바이더 인증
//!   - 인증 시작 (`GET /hybridauth/{provider}/{method}`)
//!   - 콜백 (`GET /hybridauth/callback`)

pub mod hybridauth;
