//! 인증 흐름/세션 모델

pub mod auth_context;
pub mod session;

pub use auth_context::{AuthContext, AuthMethod};
pub use session::{OAuthStateRecord, SessionRecord};
