//! # 외부 인증 애플리케이션 서비스
//!
//! OAuth 콜백에서 얻은 외부 프로필로 로그인(`auth`) 또는 계정 연결(`attach`)을 수행하고,
//! 리다이렉트할 대상 URL을 돌려줍니다.
//!
//! | 동작 | 성공 | 실패 |
//! |------|------|------|
//! | `auth` | 새 세션 인증, 이전 세션 로그아웃 후 리다이렉트 대상 반환 | 이전 세션 로그아웃 후 에러 전파 |
//! | `attach` | 링크 저장 후 리다이렉트 대상 반환 | 세션 변경 없이 에러 전파 |

use crate::{
    core::errors::{AppError, AppResult},
    domain::{
        entities::users::User,
        models::{auth::AuthContext, oauth::ExternalProfile},
    },
    services::{auth::session_authority::SessionAuthority, identity::IdentityResolver},
    utils::string_utils::{append_query_param, decode_redirect_target},
};

#[derive(Clone)]
pub struct HybridauthApp {
    resolver: IdentityResolver,
}

impl HybridauthApp {
    /// 실패 시 리다이렉트 URL에 붙는 쿼리 파라미터명
    pub const ERROR_QUERY: &'static str = "oauth-error";

    pub fn new(resolver: IdentityResolver) -> Self {
        Self { resolver }
    }

    /// 외부 프로필로 로그인합니다.
    ///
    /// 성공하면 새로 발급한 `fresh` 세션을 인증하고, 요청이 가지고 온 `previous` 세션은 로그아웃시킵니다.
    /// 클라이언트가 보낸 세션 ID는 인증된 세션으로 승격되지 않습니다.
    /// `redirect`는 URL 인코딩된 상태로 받아 디코딩한 값을 돌려줍니다.
    /// 어떤 단계에서 실패하든 `previous` 세션을 로그아웃시킨 뒤 원래 에러를 반환합니다.
    pub async fn auth(
        &self,
        profile: &ExternalProfile,
        redirect: &str,
        previous: Option<&dyn SessionAuthority>,
        fresh: &dyn SessionAuthority,
    ) -> AppResult<String> {
        if let Err(e) = self.authorize_session(profile, fresh).await {
            return Err(Self::abort_auth(previous, e).await);
        }

        if let Some(previous) = previous {
            if let Err(logout_error) = previous.logout().await {
                log::error!("이전 세션 로그아웃 실패: {}", logout_error);
            }
        }
        Ok(decode_redirect_target(redirect))
    }

    /// 로그인 실패 처리: 세션을 로그아웃시키고 원래 에러를 돌려줍니다.
    ///
    /// 프로필을 얻기 전(프로바이더 에러, 토큰 교환 실패) 단계의 실패에도 사용합니다.
    pub async fn abort_auth(session: Option<&dyn SessionAuthority>, error: AppError) -> AppError {
        log::warn!("외부 로그인 실패, 세션 로그아웃: {}", error);
        if let Some(session) = session {
            if let Err(logout_error) = session.logout().await {
                log::error!("로그인 실패 후 로그아웃 실패: {}", logout_error);
            }
        }
        error
    }

    async fn authorize_session(&self, profile: &ExternalProfile, session: &dyn SessionAuthority) -> AppResult<()> {
        let user = self.resolver.resolve_login(profile).await?;
        session.set_authorized(&user, &AuthContext::hybridauth()).await
    }

    /// 외부 계정을 현재 사용자에게 연결합니다. 세션은 건드리지 않습니다.
    pub async fn attach(&self, profile: &ExternalProfile, redirect: &str, current_user: &User) -> AppResult<String> {
        self.resolver.resolve_attach(profile, current_user).await?;
        Ok(decode_redirect_target(redirect))
    }

    /// 실패를 알리는 리다이렉트 URL
    pub fn error_redirect(redirect: &str, error: &AppError) -> String {
        append_query_param(&decode_redirect_target(redirect), Self::ERROR_QUERY, error.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use crate::domain::entities::users::Group;
    use crate::repositories::{memory::InMemoryIdentityStore, UserRepository};

    #[derive(Debug, Clone, PartialEq)]
    enum SessionEvent {
        Authorized(String, String),
        Logout,
    }

    #[derive(Default)]
    struct RecordingSession {
        events: Mutex<Vec<SessionEvent>>,
    }

    impl RecordingSession {
        fn events(&self) -> Vec<SessionEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SessionAuthority for RecordingSession {
        async fn set_authorized(&self, user: &User, context: &AuthContext) -> AppResult<()> {
            self.events
                .lock()
                .unwrap()
                .push(SessionEvent::Authorized(user.id_string(), context.authenticate.clone()));
            Ok(())
        }

        async fn logout(&self) -> AppResult<()> {
            self.events.lock().unwrap().push(SessionEvent::Logout);
            Ok(())
        }
    }

    fn app(store: Arc<InMemoryIdentityStore>, allow_auto_register: bool) -> HybridauthApp {
        HybridauthApp::new(IdentityResolver::new(store, allow_auto_register))
    }

    fn profile() -> ExternalProfile {
        ExternalProfile::new("google", "id1").unwrap()
    }

    #[actix_web::test]
    async fn test_auth_authorizes_fresh_session_and_decodes_redirect() {
        let store = Arc::new(InMemoryIdentityStore::with_default_group());
        let previous = RecordingSession::default();
        let fresh = RecordingSession::default();

        let target = app(store.clone(), true)
            .auth(&profile(), "https%3A%2F%2Fcms.example.com%2Fadmin%3Ftab%3D1", Some(&previous), &fresh)
            .await
            .unwrap();

        assert_eq!(target, "https://cms.example.com/admin?tab=1");
        let user_id = store.users()[0].id_string();
        assert_eq!(
            fresh.events(),
            vec![SessionEvent::Authorized(user_id, AuthContext::HYBRIDAUTH.to_string())]
        );
        assert_eq!(previous.events(), vec![SessionEvent::Logout]);
    }

    #[actix_web::test]
    async fn test_auth_without_previous_session() {
        let store = Arc::new(InMemoryIdentityStore::with_default_group());
        let fresh = RecordingSession::default();

        app(store, true).auth(&profile(), "%2F", None, &fresh).await.unwrap();

        assert!(matches!(fresh.events().as_slice(), [SessionEvent::Authorized(..)]));
    }

    #[actix_web::test]
    async fn test_auth_failure_logs_out() {
        let store = Arc::new(InMemoryIdentityStore::with_default_group());
        let previous = RecordingSession::default();
        let fresh = RecordingSession::default();

        let result = app(store, false).auth(&profile(), "%2F", Some(&previous), &fresh).await;

        assert!(matches!(result, Err(AppError::AutoRegisterDisabled)));
        assert_eq!(previous.events(), vec![SessionEvent::Logout]);
        assert!(fresh.events().is_empty());
    }

    #[actix_web::test]
    async fn test_auth_missing_group_logs_out() {
        let store = Arc::new(InMemoryIdentityStore::new());
        let previous = RecordingSession::default();
        let fresh = RecordingSession::default();

        let result = app(store, true).auth(&profile(), "%2F", Some(&previous), &fresh).await;

        assert!(matches!(result, Err(AppError::MissingDefaultGroup(_))));
        assert_eq!(previous.events(), vec![SessionEvent::Logout]);
        assert!(fresh.events().is_empty());
    }

    #[actix_web::test]
    async fn test_abort_auth_returns_original_error() {
        let session = RecordingSession::default();

        let error = HybridauthApp::abort_auth(
            Some(&session),
            AppError::ExternalServiceError("token exchange failed".to_string()),
        )
        .await;

        assert!(matches!(error, AppError::ExternalServiceError(_)));
        assert_eq!(session.events(), vec![SessionEvent::Logout]);
    }

    #[actix_web::test]
    async fn test_attach_failure_leaves_session_untouched() {
        let store = Arc::new(InMemoryIdentityStore::with_default_group());
        let session = RecordingSession::default();
        let group = store.find_group_by_name(Group::DEFAULT_NAME).await.unwrap().unwrap();
        let user = User::new_federated("owner".to_string(), "Owner".to_string(), None, &group);
        let mut invalid = profile();
        invalid.provider = String::new();

        let result = app(store, true).attach(&invalid, "%2F", &user).await;

        assert!(matches!(result, Err(AppError::InvalidExternalProfile(_))));
        assert!(session.events().is_empty());
    }

    #[actix_web::test]
    async fn test_attach_returns_decoded_redirect() {
        let store = Arc::new(InMemoryIdentityStore::with_default_group());
        let group = store.find_group_by_name(Group::DEFAULT_NAME).await.unwrap().unwrap();
        let user = User::new_federated("owner".to_string(), "Owner".to_string(), None, &group);
        UserRepository::save(store.as_ref(), &user).await.unwrap();

        let target = app(store.clone(), false)
            .attach(&profile(), "%2Fprofile%2Faccounts", &user)
            .await
            .unwrap();

        assert_eq!(target, "/profile/accounts");
        assert_eq!(store.links()[0].user_id, user.id);
    }

    #[test]
    fn test_error_redirect_appends_code() {
        let url = HybridauthApp::error_redirect("%2Flogin%3Fnext%3D%252F", &AppError::AutoRegisterDisabled);
        assert_eq!(url, "/login?next=%2F&oauth-error=auto_register_disabled");
    }
}
