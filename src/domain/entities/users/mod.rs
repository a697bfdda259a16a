//! Users Entity Module
//!
//! 로컬 사용자와 그룹 엔티티입니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use crate::domain::entities::users::{Group, User};
//!
//! let group = Group::new(Group::DEFAULT_NAME);
//! let user = User::new_federated(
//!     "user18c3f1a2b4d5e6a1f9c0d2e".to_string(),
//!     "Alice".to_string(),
//!     Some("alice@example.com".to_string()),
//!     &group,
//! );
//! assert!(!user.can_authenticate_with_password());
//! ```

pub mod user;
pub mod group;

pub use user::User;
pub use group::Group;
