//! # Configuration Module
//!
//! 서비스 설정을 담당하는 모듈입니다.
//! 모든 설정값은 환경 변수(및 `PROFILE`에 따라 로드되는 `.env` 파일)에서 읽습니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 실행 환경, 서버, 저장소 백엔드 설정
//! - [`auth_config`] - 자동 가입 정책, 프로바이더 자격 증명, 세션 설정
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::config::{HybridauthConfig, ServerConfig, StorageConfig};
//!
//! let hybridauth = HybridauthConfig::from_env()?;
//! println!("auto register: {}", hybridauth.allow_auto_register);
//! println!("callback: {}", hybridauth.callback_url);
//!
//! let backend = StorageConfig::backend()?;
//! let bind = format!("{}:{}", ServerConfig::host(), ServerConfig::port());
//! ```

pub mod data_config;
pub mod auth_config;

pub use data_config::*;
pub use auth_config::*;
