//! # OAuth 2.0 / OIDC 엔진
//!
//! 프로바이더 인증 페이지 URL을 만들고, 콜백의 Authorization Code를
//! 정규화된 [`ExternalProfile`]로 바꿉니다.
//!
//! ```text
//! authorize_url ──► 프로바이더 로그인 ──► callback?code&state
//!                                            │
//!        fetch_profile: code → access_token → userinfo → ExternalProfile
//! ```

use async_trait::async_trait;
use crate::{
    config::{HybridauthConfig, ProviderConfig},
    core::errors::{AppError, AppResult},
    domain::models::oauth::{ExternalProfile, OidcUserInfo, TokenResponse},
};

/// 외부 인증 엔진 계약
#[async_trait]
pub trait OAuthEngine: Send + Sync {
    /// 설정된 프로바이더인지 여부
    fn supports(&self, provider: &str) -> bool;

    /// 프로바이더 인증 페이지 URL
    fn authorize_url(&self, provider: &str, state: &str) -> AppResult<String>;

    /// Authorization Code로 검증된 외부 프로필을 가져옵니다.
    async fn fetch_profile(&self, provider: &str, code: &str) -> AppResult<ExternalProfile>;
}

/// 설정된 프로바이더들에 대한 Authorization Code + userinfo 클라이언트
#[derive(Clone)]
pub struct OidcEngine {
    config: HybridauthConfig,
    http: reqwest::Client,
}

impl OidcEngine {
    pub fn new(config: HybridauthConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    async fn exchange_code_for_token(&self, provider: &ProviderConfig, code: &str) -> AppResult<TokenResponse> {
        let params = [
            ("code", code),
            ("client_id", provider.client_id.as_str()),
            ("client_secret", provider.client_secret.as_str()),
            ("redirect_uri", self.config.callback_url.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .http
            .post(&provider.token_uri)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("{} 토큰 요청 실패: {}", provider.name, e)))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "{} 토큰 교환 실패: {}", provider.name, error_text
            )));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("{} 토큰 응답 파싱 실패: {}", provider.name, e)))
    }

    async fn get_user_info(&self, provider: &ProviderConfig, access_token: &str) -> AppResult<OidcUserInfo> {
        let response = self
            .http
            .get(&provider.userinfo_uri)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("{} 사용자 정보 요청 실패: {}", provider.name, e)))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "{} 사용자 정보 조회 실패: {}", provider.name, error_text
            )));
        }

        response
            .json::<OidcUserInfo>()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("{} 사용자 정보 파싱 실패: {}", provider.name, e)))
    }
}

/// 인증 페이지 URL을 조립합니다.
pub fn build_authorize_url(provider: &ProviderConfig, callback_url: &str, state: &str) -> String {
    let params = [
        ("client_id", provider.client_id.as_str()),
        ("redirect_uri", callback_url),
        ("scope", provider.scope.as_str()),
        ("response_type", "code"),
        ("state", state),
    ];

    let query_string = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    let separator = if provider.auth_uri.contains('?') { '&' } else { '?' };
    format!("{}{}{}", provider.auth_uri, separator, query_string)
}

#[async_trait]
impl OAuthEngine for OidcEngine {
    fn supports(&self, provider: &str) -> bool {
        self.config.provider(provider).is_ok()
    }

    fn authorize_url(&self, provider: &str, state: &str) -> AppResult<String> {
        let provider = self.config.provider(provider)?;
        Ok(build_authorize_url(provider, &self.config.callback_url, state))
    }

    async fn fetch_profile(&self, provider: &str, code: &str) -> AppResult<ExternalProfile> {
        let provider = self.config.provider(provider)?;

        let token = self.exchange_code_for_token(provider, code).await?;
        let user_info = self.get_user_info(provider, &token.access_token).await?;

        user_info.into_profile(&provider.name)
    }
}
