//! # Hybridauth Configuration
//!
//! 외부 프로바이더 로그인과 세션에 관련된 설정입니다.
//!
//! ## 환경 변수
//!
//! ```bash
//! # 미등록 외부 계정의 자동 가입 허용 여부 (기본값: true)
//! export HYBRIDAUTH_ALLOW_AUTO_REGISTER="true"
//!
//! # 사용할 프로바이더 목록
//! export HYBRIDAUTH_PROVIDERS="google,gitlab"
//!
//! # 프로바이더별 자격 증명 (<P>는 대문자 프로바이더 키)
//! export HYBRIDAUTH_GOOGLE_CLIENT_ID="..."
//! export HYBRIDAUTH_GOOGLE_CLIENT_SECRET="..."
//!
//! # Google 이외의 프로바이더는 엔드포인트가 필수
//! export HYBRIDAUTH_GITLAB_AUTH_URI="https://gitlab.com/oauth/authorize"
//! export HYBRIDAUTH_GITLAB_TOKEN_URI="https://gitlab.com/oauth/token"
//! export HYBRIDAUTH_GITLAB_USERINFO_URI="https://gitlab.com/oauth/userinfo"
//! export HYBRIDAUTH_GITLAB_SCOPE="openid email profile"
//! ```
//!
//! 콜백 URL은 설정하지 않고 `PUBLIC_BASE_URL`에서 계산합니다.

use std::collections::HashMap;
use std::env;
use crate::config::ServerConfig;
use crate::core::errors::{AppError, AppResult};

/// OAuth 콜백 라우트 경로
pub const CALLBACK_PATH: &str = "/hybridauth/callback";

/// 절대 경로 콜백 URL을 계산합니다.
pub fn callback_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), CALLBACK_PATH)
}

/// 설정 문자열을 bool로 해석합니다.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// 외부 인증 모듈 설정
#[derive(Debug, Clone)]
pub struct HybridauthConfig {
    /// 연결 정보가 없는 외부 계정으로 로그인 시 로컬 계정을 자동 생성할지 여부
    pub allow_auto_register: bool,
    /// 프로바이더에 전달할 절대 경로 콜백 URL
    pub callback_url: String,
    providers: HashMap<String, ProviderConfig>,
}

impl HybridauthConfig {
    pub fn new(allow_auto_register: bool, base_url: &str) -> Self {
        Self {
            allow_auto_register,
            callback_url: callback_url(base_url),
            providers: HashMap::new(),
        }
    }

    /// 환경 변수에서 전체 설정을 읽습니다.
    ///
    /// `HYBRIDAUTH_ALLOW_AUTO_REGISTER` 값이 해석 불가능하면 경고 후 기본값 `true`를 사용합니다.
    pub fn from_env() -> AppResult<Self> {
        let allow_auto_register = match env::var("HYBRIDAUTH_ALLOW_AUTO_REGISTER") {
            Ok(raw) => parse_bool(&raw).unwrap_or_else(|| {
                log::warn!("HYBRIDAUTH_ALLOW_AUTO_REGISTER 값 '{}' 해석 실패, 기본값 true 사용", raw);
                true
            }),
            Err(_) => true,
        };

        let mut config = Self::new(allow_auto_register, &ServerConfig::public_base_url());

        let names = env::var("HYBRIDAUTH_PROVIDERS").unwrap_or_else(|_| "google".to_string());
        for name in names.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            config = config.with_provider(ProviderConfig::from_env(name)?);
        }

        Ok(config)
    }

    pub fn with_provider(mut self, provider: ProviderConfig) -> Self {
        self.providers.insert(provider.name.clone(), provider);
        self
    }

    /// 프로바이더 설정 조회 (키는 대소문자 무관)
    pub fn provider(&self, name: &str) -> AppResult<&ProviderConfig> {
        self.providers
            .get(&name.to_lowercase())
            .ok_or_else(|| AppError::ValidationError(format!("Unsupported provider: {}", name)))
    }

    pub fn provider_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// 단일 OAuth2 / OIDC 프로바이더 설정
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// 소문자 프로바이더 키 (`google`, `gitlab` 등)
    pub name: String,
    pub client_id: String,
    pub client_secret: String,
    pub auth_uri: String,
    pub token_uri: String,
    pub userinfo_uri: String,
    pub scope: String,
}

impl ProviderConfig {
    pub fn from_env(name: &str) -> AppResult<Self> {
        let name = name.to_lowercase();
        let prefix = format!("HYBRIDAUTH_{}", name.to_uppercase().replace('-', "_"));
        let var = |suffix: &str| env::var(format!("{}_{}", prefix, suffix)).ok();
        let required = |suffix: &str, default: Option<&str>| -> AppResult<String> {
            var(suffix)
                .or_else(|| default.map(str::to_string))
                .ok_or_else(|| AppError::InternalError(format!("{}_{} must be set", prefix, suffix)))
        };

        let defaults = Self::well_known_endpoints(&name);

        Ok(Self {
            client_id: required("CLIENT_ID", None)?,
            client_secret: required("CLIENT_SECRET", None)?,
            auth_uri: required("AUTH_URI", defaults.map(|d| d.0))?,
            token_uri: required("TOKEN_URI", defaults.map(|d| d.1))?,
            userinfo_uri: required("USERINFO_URI", defaults.map(|d| d.2))?,
            scope: var("SCOPE").unwrap_or_else(|| "openid email profile".to_string()),
            name,
        })
    }

    /// (auth, token, userinfo) 기본 엔드포인트
    fn well_known_endpoints(name: &str) -> Option<(&'static str, &'static str, &'static str)> {
        match name {
            "google" => Some((
                "https://accounts.google.com/o/oauth2/v2/auth",
                "https://oauth2.googleapis.com/token",
                "https://openidconnect.googleapis.com/v1/userinfo",
            )),
            _ => None,
        }
    }
}

/// 세션 및 OAuth state 저장 설정
pub struct SessionConfig;

impl SessionConfig {
    pub const COOKIE_NAME: &'static str = "hybridauth_sid";

    pub fn session_ttl_seconds() -> u64 {
        env::var("SESSION_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86_400)
    }

    pub fn oauth_state_ttl_seconds() -> u64 {
        env::var("OAUTH_STATE_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(name: &str) -> ProviderConfig {
        ProviderConfig {
            name: name.to_string(),
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            auth_uri: "https://idp.example.com/authorize".to_string(),
            token_uri: "https://idp.example.com/token".to_string(),
            userinfo_uri: "https://idp.example.com/userinfo".to_string(),
            scope: "openid".to_string(),
        }
    }

    #[test]
    fn test_callback_url_is_absolute() {
        assert_eq!(callback_url("https://cms.example.com/"), "https://cms.example.com/hybridauth/callback");
        assert_eq!(callback_url("http://localhost:8080"), "http://localhost:8080/hybridauth/callback");
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool(" On "), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_provider_lookup_is_case_insensitive() {
        let config = HybridauthConfig::new(true, "http://localhost").with_provider(provider("google"));

        assert!(config.provider("Google").is_ok());
        assert!(matches!(config.provider("twitter"), Err(AppError::ValidationError(_))));
        assert_eq!(config.provider_names(), vec!["google"]);
    }

    #[test]
    fn test_google_has_default_endpoints() {
        assert!(ProviderConfig::well_known_endpoints("google").is_some());
        assert!(ProviderConfig::well_known_endpoints("gitlab").is_none());
    }
}
