//! 공통 유틸리티 함수 모듈
//!
//! # Modules
//!
//! - [`string_utils`] - 문자열 검증, 정리, 리다이렉트 URL 처리
//! - [`token`] - 로그인명/세션 ID 등 고유 토큰 생성

pub mod string_utils;
pub mod token;
