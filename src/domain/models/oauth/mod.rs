//! OAuth 관련 도메인 모델
//!
//! - [`external_profile`] - 인증 완료 후 정규화된 외부 프로필과 표시 이름 규칙
//! - [`oidc`] - 토큰/userinfo 응답과 프로필 변환

pub mod external_profile;
pub mod oidc;

pub use external_profile::ExternalProfile;
pub use oidc::{OidcUserInfo, TokenResponse};
