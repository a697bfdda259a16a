//! 사용자/그룹 데이터 액세스
//!
//! [`MongoUserRepository`](user_repo::MongoUserRepository)는 [`UserRepository`](crate::repositories::UserRepository)
//! 계약의 MongoDB 구현입니다.

pub mod user_repo;

pub use user_repo::MongoUserRepository;
