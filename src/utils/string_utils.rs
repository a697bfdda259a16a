//! # 문자열 유틸리티
//!
//! 외부 프로필 값 정리와 리다이렉트 URL 처리에 쓰이는 공통 함수들입니다.

use serde::Deserialize;
use crate::core::errors::AppError;

/// 필수 문자열 필드 검증 및 정리
///
/// 빈 문자열이나 공백만 있는 경우 ValidationError를 반환하고,
/// 유효한 문자열인 경우 앞뒤 공백을 제거한 문자열을 반환합니다.
///
/// # 예제
/// ```rust,ignore
/// assert_eq!(validate_required_string("  google  ", "provider").unwrap(), "google");
/// assert!(validate_required_string("   ", "provider").is_err());
/// ```
pub fn validate_required_string(value: &str, field_name: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(
            format!("{} is required", field_name)
        ));
    }
    Ok(trimmed.to_string())
}

/// 선택적 문자열 필드 정리
///
/// None 값이거나 빈 문자열/공백만 있는 경우 None을 반환하고,
/// 유효한 문자열인 경우 앞뒤 공백을 제거하여 Some으로 반환합니다.
pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// 선택적 문자열 필드를 위한 serde deserializer
///
/// `#[serde(default, deserialize_with = "deserialize_optional_string")]`와 함께 사용하면
/// 프로바이더가 보내는 `""`나 `"   "`가 None으로 정리됩니다.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(clean_optional_string(opt))
}

/// URL 인코딩된 리다이렉트 대상을 디코딩합니다.
///
/// 디코딩할 수 없는 값(잘못된 UTF-8 시퀀스)은 원본 그대로 돌려줍니다.
pub fn decode_redirect_target(encoded: &str) -> String {
    urlencoding::decode(encoded)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| encoded.to_string())
}

/// 리다이렉트 URL에 쿼리 파라미터를 덧붙입니다.
pub fn append_query_param(url: &str, key: &str, value: &str) -> String {
    let (base, fragment) = match url.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (url, None),
    };
    let separator = if base.contains('?') { '&' } else { '?' };
    let mut result = format!(
        "{}{}{}={}",
        base,
        separator,
        urlencoding::encode(key),
        urlencoding::encode(value)
    );
    if let Some(fragment) = fragment {
        result.push('#');
        result.push_str(fragment);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required_string() {
        assert_eq!(validate_required_string("google", "provider").unwrap(), "google");
        assert_eq!(validate_required_string("  id-1  ", "external_id").unwrap(), "id-1");
        assert!(validate_required_string("", "provider").is_err());
        assert!(validate_required_string("   ", "provider").is_err());
    }

    #[test]
    fn test_clean_optional_string() {
        assert_eq!(clean_optional_string(Some("  Alice  ".to_string())), Some("Alice".to_string()));
        assert_eq!(clean_optional_string(Some("   ".to_string())), None);
        assert_eq!(clean_optional_string(Some("".to_string())), None);
        assert_eq!(clean_optional_string(None), None);
    }

    #[test]
    fn test_deserialize_optional_string() {
        #[derive(Deserialize)]
        struct Claims {
            #[serde(default, deserialize_with = "deserialize_optional_string")]
            name: Option<String>,
        }

        let claims: Claims = serde_json::from_str(r#"{"name": "  Bob "}"#).unwrap();
        assert_eq!(claims.name, Some("Bob".to_string()));

        let claims: Claims = serde_json::from_str(r#"{"name": ""}"#).unwrap();
        assert_eq!(claims.name, None);

        let claims: Claims = serde_json::from_str(r#"{"name": null}"#).unwrap();
        assert_eq!(claims.name, None);

        let claims: Claims = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(claims.name, None);
    }

    #[test]
    fn test_decode_redirect_target() {
        assert_eq!(decode_redirect_target("%2Fprofile%3Ftab%3Dlinks"), "/profile?tab=links");
        assert_eq!(decode_redirect_target("/plain"), "/plain");
    }

    #[test]
    fn test_append_query_param() {
        assert_eq!(append_query_param("/login", "oauth-error", "denied"), "/login?oauth-error=denied");
        assert_eq!(append_query_param("/login?next=1", "oauth-error", "a b"), "/login?next=1&oauth-error=a%20b");
        assert_eq!(append_query_param("/login#top", "oauth-error", "x"), "/login?oauth-error=x#top");
    }
}
