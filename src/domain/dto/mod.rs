//! # Data Transfer Objects (DTO) Module
//!
//! HTTP 경계에서 받는 쿼리 파라미터를 정의합니다.
//! 입력값 검증은 `validator` crate의 derive로 선언하고 핸들러에서 `validate()`를 호출합니다.

pub mod hybridauth;

pub use hybridauth::*;
