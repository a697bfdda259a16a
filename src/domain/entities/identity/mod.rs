//! Identity Entity Module
//!
//! 외부 프로바이더 계정과 로컬 사용자 사이의 연결(IdentityLink)을 정의합니다.
//! `(provider, external_id)`가 자연 키이며 저장소에서 유니크 제약으로 강제됩니다.

pub mod identity_link;

pub use identity_link::IdentityLink;
