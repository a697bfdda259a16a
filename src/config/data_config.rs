//! # Data & Server Configuration
//!
//! 실행 환경, HTTP 서버, 저장소 백엔드 관련 설정입니다.
//! 모든 값은 환경 변수에서 읽으며, 누락 시 개발용 기본값을 사용합니다.

use std::env;

/// 실행 환경 구분
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    /// `ENVIRONMENT` 환경 변수에서 현재 환경을 결정합니다.
    ///
    /// 값이 없거나 알 수 없는 값이면 `Production`으로 간주합니다.
    pub fn current() -> Self {
        Self::from_str(&env::var("ENVIRONMENT").unwrap_or_else(|_| "production".to_string()))
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    /// 세션 쿠키에 `Secure` 속성을 붙여야 하는 환경인지 여부
    pub fn requires_secure_cookies(&self) -> bool {
        matches!(self, Environment::Staging | Environment::Production)
    }
}

/// HTTP 서버 바인딩 설정
pub struct ServerConfig;

impl ServerConfig {
    pub fn port() -> u16 {
        env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080)
    }

    pub fn host() -> String {
        env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string())
    }

    /// 외부에서 접근 가능한 서비스의 기준 URL
    ///
    /// OAuth 콜백 URL(절대 경로)을 계산할 때 사용합니다.
    pub fn public_base_url() -> String {
        env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string())
            .trim_end_matches('/')
            .to_string()
    }
}

/// 식별 정보 저장소 백엔드 종류
#[derive(Debug, Clone, PartialEq)]
pub enum StorageBackend {
    /// MongoDB (운영용, 트랜잭션을 위해 replica set 필요)
    MongoDb,
    /// 프로세스 메모리 (개발/테스트용, 재시작 시 소실)
    Memory,
}

impl StorageBackend {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StorageBackend::MongoDb),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            _ => Err(format!("Unsupported storage backend: {}", s)),
        }
    }
}

/// 저장소 연결 설정
pub struct StorageConfig;

impl StorageConfig {
    pub fn backend() -> Result<StorageBackend, String> {
        StorageBackend::from_str(&env::var("STORAGE_BACKEND").unwrap_or_else(|_| "mongodb".to_string()))
    }

    pub fn mongodb_uri() -> String {
        env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string())
    }

    pub fn database_name() -> String {
        env::var("DATABASE_NAME").unwrap_or_else(|_| "hybridauth_dev".to_string())
    }

    pub fn redis_url() -> String {
        env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_string() {
        assert_eq!(Environment::from_str("development"), Environment::Development);
        assert_eq!(Environment::from_str("test"), Environment::Test);
        assert_eq!(Environment::from_str("production"), Environment::Production);
        assert_eq!(Environment::from_str("unknown"), Environment::Production);
    }

    #[test]
    fn test_secure_cookies_per_environment() {
        assert!(!Environment::Development.requires_secure_cookies());
        assert!(!Environment::Test.requires_secure_cookies());
        assert!(Environment::Staging.requires_secure_cookies());
        assert!(Environment::Production.requires_secure_cookies());
    }

    #[test]
    fn test_storage_backend_from_string() {
        assert_eq!(StorageBackend::from_str("mongodb").unwrap(), StorageBackend::MongoDb);
        assert_eq!(StorageBackend::from_str("MEMORY").unwrap(), StorageBackend::Memory);
        assert!(StorageBackend::from_str("postgres").is_err());
    }

    #[test]
    fn test_server_config_defaults() {
        if env::var("PORT").is_err() {
            assert_eq!(ServerConfig::port(), 8080);
        }

        if env::var("PUBLIC_BASE_URL").is_err() {
            assert_eq!(ServerConfig::public_base_url(), "http://localhost:8080");
        }
    }
}
