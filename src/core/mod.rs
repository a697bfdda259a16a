//! # Core Module
//!
//! 서비스 전역에서 공유하는 핵심 타입을 제공합니다.
//!
//! ### [`errors`] - 통합 에러 처리
//! - **AppError**: 도메인 에러(자동 가입 거부, 중복 식별자 등)와 인프라 에러를 하나로 표현
//! - **HTTP 통합**: Actix-Web `ResponseError` 구현
//! - **자동 변환**: MongoDB/Redis 에러의 `From` 변환
//!
//! ### [`app_state`] - 조립된 의존성
//! - 전역 레지스트리 없이 생성자 주입(`Arc<dyn Trait>`)으로 전달
//! - 조립은 `main.rs`에서 한 번만 일어나고 핸들러는 `web::Data<AppState>`로 받음

pub mod errors;
pub mod app_state;

pub use errors::*;
pub use app_state::AppState;
