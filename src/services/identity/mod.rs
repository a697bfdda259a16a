//! 외부 식별 정보 해석
//!
//! 외부 프로필을 로컬 사용자와 IdentityLink로 해석하는 핵심 비즈니스 로직입니다.

pub mod identity_resolver;

pub use identity_resolver::IdentityResolver;
