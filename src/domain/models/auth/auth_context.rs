//! 인증 흐름 컨텍스트
//!
//! 콜백이 어떤 동작(`auth`/`attach`)으로 시작되었는지와
//! 세션에 기록할 인증 방식 정보를 표현합니다.

use serde::{Deserialize, Serialize};
use crate::core::errors::AppError;

/// 세션 인증 시 함께 기록하는 컨텍스트
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// 인증 방식 식별자
    pub authenticate: String,
}

impl AuthContext {
    pub const HYBRIDAUTH: &'static str = "hybridauth";

    /// 외부 프로바이더 로그인으로 인증된 세션의 컨텍스트
    pub fn hybridauth() -> Self {
        Self {
            authenticate: Self::HYBRIDAUTH.to_string(),
        }
    }
}

/// 콜백에서 허용되는 동작
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    /// 로그인 (필요 시 자동 가입)
    Auth,
    /// 현재 로그인한 사용자에게 외부 계정 연결
    Attach,
}

impl AuthMethod {
    pub const ALLOW_METHODS: [&'static str; 2] = ["auth", "attach"];

    pub fn from_str(s: &str) -> Result<Self, AppError> {
        match s {
            "auth" => Ok(AuthMethod::Auth),
            "attach" => Ok(AuthMethod::Attach),
            _ => Err(AppError::ValidationError(format!(
                "Method '{}' is not allowed, expected one of {:?}",
                s,
                Self::ALLOW_METHODS
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMethod::Auth => "auth",
            AuthMethod::Attach => "attach",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_allowed_methods_parse() {
        for method in AuthMethod::ALLOW_METHODS {
            assert_eq!(AuthMethod::from_str(method).unwrap().as_str(), method);
        }
        assert!(AuthMethod::from_str("register").is_err());
        assert!(AuthMethod::from_str("AUTH").is_err());
    }

    #[test]
    fn test_hybridauth_context() {
        assert_eq!(AuthContext::hybridauth().authenticate, "hybridauth");
    }
}
