//! # Application Error Handling System
//!
//! 페더레이션 인증 서비스 전역에서 사용하는 통합 에러 타입입니다.
//! `thiserror`로 `Error` trait을 구현하고, `actix_web::ResponseError`를 구현하여
//! 핸들러에서 그대로 HTTP 응답으로 변환됩니다.
//!
//! ## 도메인 에러
//!
//! | AppError | HTTP Status | 의미 |
//! |----------|-------------|------|
//! | `AutoRegisterDisabled` | 401 Unauthorized | 미등록 외부 계정 + 자동 가입 비활성화 |
//! | `DuplicateIdentity` | 409 Conflict | `(provider, external_id)` 유니크 제약 경합 |
//! | `MissingDefaultGroup` | 500 Internal Server Error | 기본 그룹 `Users` 미존재 (설정 오류) |
//! | `PersistenceFailure` | 500 Internal Server Error | 저장소 조회/저장 실패 |
//! | `InvalidExternalProfile` | 400 Bad Request | provider 또는 external_id 누락 |
//!
//! ## 인프라/요청 에러
//!
//! | AppError | HTTP Status |
//! |----------|-------------|
//! | `ValidationError` | 400 Bad Request |
//! | `AuthenticationError` | 401 Unauthorized |
//! | `RedisError` | 500 Internal Server Error |
//! | `ExternalServiceError` | 502 Bad Gateway |
//! | `InternalError` | 500 Internal Server Error |
//!
//! ## 사용 패턴
//!
//! ```rust,ignore
//! use crate::core::errors::AppError;
//!
//! let link = links
//!     .find_one(doc! { "provider": provider, "external_id": external_id })
//!     .await
//!     .map_err(|e| AppError::PersistenceFailure(e.to_string()))?;
//! ```

use thiserror::Error;

/// 애플리케이션 전역 에러 타입
///
/// 식별 정보 해석(resolve) 과정의 비즈니스 규칙 위반과
/// 인프라 계층의 실패를 모두 하나의 열거형으로 표현합니다.
#[derive(Error, Debug)]
pub enum AppError {
    /// 연결된 계정이 없는 외부 로그인인데 자동 가입이 꺼져 있음
    ///
    /// 사용자에게는 인증 실패로 보입니다.
    #[error("New registration via external providers is not allowed")]
    AutoRegisterDisabled,

    /// 동시 가입 경합으로 `(provider, external_id)` 유니크 제약 위반
    ///
    /// 복구 가능한 에러입니다. 호출자는 로그인 조회를 다시 수행해야 하며
    /// 두 번째 사용자를 만들어서는 안 됩니다.
    #[error("Identity {provider}:{external_id} is already linked")]
    DuplicateIdentity {
        provider: String,
        external_id: String,
    },

    /// 기본 사용자 그룹이 존재하지 않음
    ///
    /// 설정 오류이므로 사용자가 복구할 수 없습니다.
    #[error("Default user group '{0}' does not exist")]
    MissingDefaultGroup(String),

    /// 저장소 조회/저장 실패
    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    /// provider 또는 external_id가 비어 있는 외부 프로필
    ///
    /// 저장소에 접근하기 전에 거부됩니다.
    #[error("Invalid external profile: {0}")]
    InvalidExternalProfile(String),

    /// 입력값 검증 에러 (400 Bad Request)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 인증 실패 에러 (401 Unauthorized)
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// Redis 세션/상태 저장소 에러 (500 Internal Server Error)
    #[error("Redis error: {0}")]
    RedisError(String),

    /// OAuth 프로바이더 통신 에러 (502 Bad Gateway)
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 내부 서버 에러 (500 Internal Server Error)
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 리다이렉트 쿼리(`oauth-error`)에 실을 짧은 에러 코드
    pub fn code(&self) -> &'static str {
        match self {
            AppError::AutoRegisterDisabled => "auto_register_disabled",
            AppError::DuplicateIdentity { .. } => "duplicate_identity",
            AppError::MissingDefaultGroup(_) => "missing_default_group",
            AppError::PersistenceFailure(_) => "persistence_failure",
            AppError::InvalidExternalProfile(_) => "invalid_external_profile",
            AppError::ValidationError(_) => "validation_error",
            AppError::AuthenticationError(_) => "authentication_error",
            AppError::RedisError(_) => "session_store_error",
            AppError::ExternalServiceError(_) => "provider_error",
            AppError::InternalError(_) => "internal_error",
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self {
            AppError::InvalidExternalProfile(_) | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::AutoRegisterDisabled | AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            AppError::DuplicateIdentity { .. } => StatusCode::CONFLICT,
            AppError::ExternalServiceError(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// HTTP 에러 응답을 생성합니다.
    ///
    /// 모든 에러는 `{"error": ..., "code": ...}` 형식의 JSON으로 응답됩니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        actix_web::HttpResponse::build(self.status_code())
            .json(serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
            }))
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

impl From<mongodb::error::Error> for AppError {
    fn from(e: mongodb::error::Error) -> Self {
        AppError::PersistenceFailure(e.to_string())
    }
}

impl From<redis::RedisError> for AppError {
    fn from(e: redis::RedisError) -> Self {
        AppError::RedisError(e.to_string())
    }
}
