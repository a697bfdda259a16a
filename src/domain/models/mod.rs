//! # Domain Models Module
//!
//! 저장소에 직접 저장되지 않는 값 객체들을 정의합니다.
//!
//! ## Entities vs Models 구분
//!
//! ### Entities (`../entities/`)
//! - MongoDB 문서로 저장되며 `_id`를 가짐
//! - 예시: `User`, `Group`, `IdentityLink`
//!
//! ### Models (`./`)
//! - 요청 단위로 만들어지는 불변 값
//! - 예시: `ExternalProfile`, `AuthContext`, `SessionRecord`
//!
//! ```text
//! Domain Layer
//! ├── entities/   ← 영속성 엔티티
//! └── models/     ← 값 객체 (이 모듈)
//!     ├── oauth/  ← 외부 프로필, OIDC 응답
//!     └── auth/   ← 인증 컨텍스트, 세션/state 레코드
//! ```

pub mod oauth;
pub mod auth;
