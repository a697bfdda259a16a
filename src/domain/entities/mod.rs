//! # Domain Entities Module
//!
//! MongoDB 문서로 저장되는 엔티티들입니다.
//!
//! | 엔티티 | 컬렉션 | 유니크 키 |
//! |--------|--------|-----------|
//! | [`users::User`] | `users` | `login` |
//! | [`users::Group`] | `groups` | `name` |
//! | [`identity::IdentityLink`] | `hybridauth` | `(provider, external_id)` |
//!
//! 모든 엔티티의 `_id`는 생성 시점에 클라이언트에서 할당됩니다.
//! 자동 가입 시 사용자와 링크를 하나의 트랜잭션으로 저장하려면
//! 저장 전에 링크가 사용자 ID를 참조할 수 있어야 하기 때문입니다.

pub mod users;
pub mod identity;
