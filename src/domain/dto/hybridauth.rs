//! 외부 인증 요청 DTO
//!
//! 인증 시작(`/hybridauth/{provider}/{method}`)과 프로바이더 콜백의 쿼리 파라미터를 매핑합니다.

use serde::Deserialize;
use validator::Validate;
use crate::utils::string_utils::deserialize_optional_string;

fn default_redirect() -> String {
    "/".to_string()
}

/// 인증 시작 쿼리 파라미터
#[derive(Debug, Deserialize, Validate)]
pub struct AuthorizeQuery {
    /// 인증 완료 후 돌아갈 URL (생략 시 `/`)
    #[serde(default = "default_redirect")]
    #[validate(length(min = 1, max = 2048, message = "redirect는 1-2048자여야 합니다"))]
    pub redirect: String,
}

/// OAuth 콜백 쿼리 파라미터
///
/// 사용자가 동의를 거부하면 프로바이더는 `code` 없이 `error`만 보냅니다.
#[derive(Debug, Deserialize, Validate)]
pub struct CallbackQuery {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub code: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, message = "State가 필요합니다"))]
    pub state: String,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub error: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub error_description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize_query_defaults_redirect() {
        let query: AuthorizeQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.redirect, "/");
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_callback_query_requires_state() {
        let query: CallbackQuery = serde_json::from_str(r#"{"code": "abc"}"#).unwrap();
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_callback_query_with_provider_error() {
        let query: CallbackQuery = serde_json::from_str(
            r#"{"state": "s1", "error": "access_denied", "code": ""}"#,
        )
        .unwrap();

        assert!(query.validate().is_ok());
        assert_eq!(query.code, None);
        assert_eq!(query.error.as_deref(), Some("access_denied"));
    }
}
