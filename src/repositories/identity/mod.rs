//! IdentityLink 데이터 액세스
//!
//! [`MongoIdentityLinkRepository`](identity_link_repo::MongoIdentityLinkRepository)는
//! [`IdentityLinkRepository`](crate::repositories::IdentityLinkRepository) 계약의 MongoDB 구현입니다.

pub mod identity_link_repo;

pub use identity_link_repo::MongoIdentityLinkRepository;
