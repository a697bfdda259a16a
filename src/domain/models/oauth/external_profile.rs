//! 외부 프로필 (External Profile)
//!
//! OAuth 엔진이 인증을 마친 뒤 돌려주는 정규화된 외부 사용자 정보입니다.
//! 요청 단위로 생성되며 이후 변경되지 않습니다.

use serde::{Deserialize, Serialize};
use crate::core::errors::{AppError, AppResult};
use crate::utils::string_utils::{clean_optional_string, validate_required_string};
use crate::utils::token::generate_unique_token;

/// 인증이 완료된 외부 프로바이더 사용자 정보
///
/// `provider`와 `external_id`는 필수이며 함께 IdentityLink의 자연 키가 됩니다.
/// 나머지 필드는 프로바이더마다 제공 여부가 다르므로 모두 선택 값입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalProfile {
    /// 프로바이더 키 (`google` 등)
    pub provider: String,
    /// 프로바이더 범위에서 유일하고 변하지 않는 식별자
    pub external_id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    /// 프로바이더가 검증을 마친 이메일 (`email`과 별개 필드)
    pub email_verified: Option<String>,
    pub photo_url: Option<String>,
    pub profile_url: Option<String>,
}

impl ExternalProfile {
    /// 필수 식별 필드로 프로필을 생성합니다.
    ///
    /// provider 키는 공백을 제거하고 소문자로 맞춥니다. `external_id`는 프로바이더가 준 값을
    /// 그대로 보존하며(정확 일치 키), 비어 있거나 공백뿐이면 `InvalidExternalProfile`을 반환합니다.
    pub fn new(provider: &str, external_id: &str) -> AppResult<Self> {
        let provider = validate_required_string(provider, "provider")
            .map_err(|_| AppError::InvalidExternalProfile("provider is required".to_string()))?;
        if external_id.trim().is_empty() {
            return Err(AppError::InvalidExternalProfile("external_id is required".to_string()));
        }

        Ok(Self {
            provider: provider.to_lowercase(),
            external_id: external_id.to_string(),
            display_name: None,
            email: None,
            email_verified: None,
            photo_url: None,
            profile_url: None,
        })
    }

    pub fn with_display_name(mut self, value: Option<String>) -> Self {
        self.display_name = clean_optional_string(value);
        self
    }

    pub fn with_email(mut self, value: Option<String>) -> Self {
        self.email = clean_optional_string(value);
        self
    }

    pub fn with_email_verified(mut self, value: Option<String>) -> Self {
        self.email_verified = clean_optional_string(value);
        self
    }

    pub fn with_photo_url(mut self, value: Option<String>) -> Self {
        self.photo_url = clean_optional_string(value);
        self
    }

    pub fn with_profile_url(mut self, value: Option<String>) -> Self {
        self.profile_url = clean_optional_string(value);
        self
    }

    /// 저장소 접근 전에 필수 필드를 재확인합니다.
    ///
    /// 필드가 공개되어 있어 생성자를 거치지 않은 값도 들어올 수 있습니다.
    pub fn validate(&self) -> AppResult<()> {
        if self.provider.trim().is_empty() {
            return Err(AppError::InvalidExternalProfile("provider is required".to_string()));
        }
        if self.external_id.trim().is_empty() {
            return Err(AppError::InvalidExternalProfile("external_id is required".to_string()));
        }
        Ok(())
    }

    /// IdentityLink에 캐시할 표시 이름
    ///
    /// `display_name → email_verified → email → external_id` 순서로 처음 존재하는 값을 씁니다.
    ///
    /// NOTE: 검증된 이메일(`email_verified`)을 일반 `email`보다 먼저 보는 순서는 의도된 것입니다.
    /// 이름이 아닌 필드끼리의 우선순위가 어색해 보여도 기존 데이터와의 호환을 위해 바꾸지 않습니다.
    pub fn resolved_display_name(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email_verified.as_deref())
            .or(self.email.as_deref())
            .unwrap_or(&self.external_id)
    }

    /// 새 로컬 계정의 사용자명
    ///
    /// 표시 이름이 없으면 프로바이더 접두사의 고유 토큰을 생성합니다.
    /// 외부 식별자나 이메일에서 파생하지 않으므로 개인정보가 들어가지 않습니다.
    pub fn user_name_or_generated(&self) -> String {
        self.display_name
            .clone()
            .unwrap_or_else(|| generate_unique_token(&self.provider))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> ExternalProfile {
        ExternalProfile::new("google", "id1").unwrap()
    }

    #[test]
    fn test_new_rejects_missing_identifiers() {
        assert!(matches!(ExternalProfile::new("", "id1"), Err(AppError::InvalidExternalProfile(_))));
        assert!(matches!(ExternalProfile::new("google", "   "), Err(AppError::InvalidExternalProfile(_))));
    }

    #[test]
    fn test_new_normalizes_provider_key_only() {
        let profile = ExternalProfile::new("  Google ", "id1").unwrap();
        assert_eq!(profile.provider, "google");
        assert_eq!(profile.external_id, "id1");
    }

    #[test]
    fn test_external_id_is_kept_verbatim() {
        let padded = ExternalProfile::new("google", " id1 ").unwrap();
        let plain = ExternalProfile::new("google", "id1").unwrap();

        assert_eq!(padded.external_id, " id1 ");
        assert_ne!(padded.external_id, plain.external_id);
    }

    #[test]
    fn test_validate_catches_hand_built_profiles() {
        let mut profile = profile();
        profile.external_id = String::new();
        assert!(matches!(profile.validate(), Err(AppError::InvalidExternalProfile(_))));
    }

    #[test]
    fn test_display_name_wins_over_everything() {
        let profile = profile()
            .with_display_name(Some("Alice".to_string()))
            .with_email_verified(Some("v@x.com".to_string()))
            .with_email(Some("e@x.com".to_string()));

        assert_eq!(profile.resolved_display_name(), "Alice");
    }

    #[test]
    fn test_verified_email_preferred_over_email() {
        let profile = profile()
            .with_email_verified(Some("v@x.com".to_string()))
            .with_email(Some("e@x.com".to_string()));

        assert_eq!(profile.resolved_display_name(), "v@x.com");
    }

    #[test]
    fn test_email_then_external_id_fallback() {
        let with_email = profile().with_email(Some("e@x.com".to_string()));
        assert_eq!(with_email.resolved_display_name(), "e@x.com");

        assert_eq!(profile().resolved_display_name(), "id1");
    }

    #[test]
    fn test_blank_optional_values_are_absent() {
        let profile = profile()
            .with_display_name(Some("   ".to_string()))
            .with_email(Some("e@x.com".to_string()));

        assert_eq!(profile.display_name, None);
        assert_eq!(profile.resolved_display_name(), "e@x.com");
    }

    #[test]
    fn test_generated_user_name_is_scoped_and_unique() {
        let profile = profile();
        let first = profile.user_name_or_generated();
        let second = profile.user_name_or_generated();

        assert!(first.starts_with("google"));
        assert!(!first.contains("id1"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_user_name_uses_display_name_when_present() {
        let profile = profile().with_display_name(Some("Alice".to_string()));
        assert_eq!(profile.user_name_or_generated(), "Alice");
    }
}
