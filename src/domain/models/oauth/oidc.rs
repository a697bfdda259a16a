//! OAuth 2.0 / OpenID Connect 응답 모델
//!
//! 토큰 엔드포인트와 userinfo 엔드포인트의 응답을 표현하고,
//! userinfo 클레임을 [`ExternalProfile`]로 변환합니다.

use serde::Deserialize;
use crate::core::errors::AppResult;
use crate::domain::models::oauth::external_profile::ExternalProfile;
use crate::utils::string_utils::deserialize_optional_string;

/// Authorization Code 교환 응답
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// OIDC 표준 userinfo 클레임
#[derive(Debug, Deserialize)]
pub struct OidcUserInfo {
    pub sub: String,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub email: Option<String>,

    /// 일부 프로바이더는 bool 대신 `"true"` 문자열을 보냅니다.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub email_verified: bool,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub picture: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub profile: Option<String>,
}

impl OidcUserInfo {
    /// 클레임을 외부 프로필로 변환합니다.
    ///
    /// 검증된 이메일 필드는 `email_verified`가 참일 때만 이메일 값으로 채웁니다.
    pub fn into_profile(self, provider: &str) -> AppResult<ExternalProfile> {
        let email_verified = if self.email_verified { self.email.clone() } else { None };

        Ok(ExternalProfile::new(provider, &self.sub)?
            .with_display_name(self.name)
            .with_email(self.email)
            .with_email_verified(email_verified)
            .with_photo_url(self.picture)
            .with_profile_url(self.profile))
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(value)) => value,
        Some(Flag::Text(value)) => value.eq_ignore_ascii_case("true"),
        None => false,
    })
}
