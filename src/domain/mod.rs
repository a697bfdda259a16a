//! # Domain Layer
//!
//! 엔티티(`entities`), 값 객체(`models`), HTTP 입력 DTO(`dto`)를 정의합니다.

pub mod entities;
pub mod models;
pub mod dto;

pub use entities::identity::IdentityLink;
pub use entities::users::{Group, User};
pub use models::auth::{AuthContext, AuthMethod, OAuthStateRecord, SessionRecord};
pub use models::oauth::ExternalProfile;
