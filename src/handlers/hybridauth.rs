//! 외부 프로바이더 인증 핸들러
//!
//! - `GET /hybridauth/{provider}/{method}` - state 발급 후 프로바이더 인증 페이지로 리다이렉트
//! - `GET /hybridauth/callback` - state 소비, 프로필 조회, `auth`/`attach` 수행 후 리다이렉트
//!
//! 콜백의 실패는 JSON이 아니라 `oauth-error` 쿼리가 붙은 리다이렉트로 응답합니다.
//! state를 찾을 수 없는 경우만 돌아갈 곳이 없으므로 에러 응답을 그대로 반환합니다.

use actix_web::{
    cookie::{time::Duration, Cookie, SameSite},
    get, http::header, web, HttpRequest, HttpResponse,
};
use validator::Validate;
use crate::{
    config::SessionConfig,
    core::{errors::{AppError, AppResult}, AppState},
    domain::{
        dto::{AuthorizeQuery, CallbackQuery},
        entities::users::User,
        models::{
            auth::{AuthMethod, OAuthStateRecord},
            oauth::ExternalProfile,
        },
    },
    repositories::UserRepository,
    services::auth::{HybridauthApp, SessionAuthority},
    utils::token::generate_opaque_id,
};

#[get("/{provider}/{method}")]
pub async fn authorize(
    path: web::Path<(String, String)>,
    query: web::Query<AuthorizeQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    query.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let (provider, method) = path.into_inner();
    let method = AuthMethod::from_str(&method)?;
    let provider = provider.to_lowercase();

    if !state.engine.supports(&provider) {
        return Err(AppError::ValidationError(format!("Unsupported provider: {}", provider)));
    }

    let record = OAuthStateRecord {
        provider,
        method,
        redirect: urlencoding::encode(&query.redirect).into_owned(),
    };
    let oauth_state = state.states.issue(&record).await?;
    let location = state.engine.authorize_url(&record.provider, &oauth_state)?;

    log::debug!("외부 인증 시작: provider={}, method={}", record.provider, record.method.as_str());

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish())
}

#[get("/callback")]
pub async fn callback(
    req: HttpRequest,
    query: web::Query<CallbackQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    query.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let record = state.states.consume(&query.state).await?;
    let session_id = incoming_session_id(&req);

    match record.method {
        AuthMethod::Auth => {
            let (previous_id, fresh_id) = rotate_session_id(session_id);
            let previous_session = previous_id.as_deref().map(|sid| state.session(sid));
            let previous = previous_session.as_ref().map(|session| session as &dyn SessionAuthority);
            let fresh = state.session(&fresh_id);

            let outcome = match fetch_profile(&state, &record, &query).await {
                Ok(profile) => state.app.auth(&profile, &record.redirect, previous, &fresh).await,
                Err(e) => Err(HybridauthApp::abort_auth(previous, e).await),
            };

            match outcome {
                Ok(target) => Ok(HttpResponse::Found()
                    .insert_header((header::LOCATION, target))
                    .cookie(session_cookie(&state, fresh_id))
                    .finish()),
                Err(e) => Ok(error_redirect(&record, &e)),
            }
        }
        AuthMethod::Attach => {
            let outcome: AppResult<String> = async {
                let user = current_user(&state, session_id.as_deref()).await?;
                let profile = fetch_profile(&state, &record, &query).await?;
                state.app.attach(&profile, &record.redirect, &user).await
            }
            .await;

            match outcome {
                Ok(target) => Ok(HttpResponse::Found()
                    .insert_header((header::LOCATION, target))
                    .finish()),
                Err(e) => Ok(error_redirect(&record, &e)),
            }
        }
    }
}

async fn fetch_profile(
    state: &AppState,
    record: &OAuthStateRecord,
    query: &CallbackQuery,
) -> AppResult<ExternalProfile> {
    if let Some(error) = &query.error {
        let description = query.error_description
            .as_deref()
            .unwrap_or("OAuth 인증이 취소되었거나 실패했습니다");
        log::warn!("{} OAuth 에러: {} - {}", record.provider, error, description);
        return Err(AppError::AuthenticationError(description.to_string()));
    }

    let code = query.code
        .as_deref()
        .ok_or_else(|| AppError::ValidationError("Authorization code가 필요합니다".to_string()))?;

    state.engine.fetch_profile(&record.provider, code).await
}

/// 요청이 가지고 온 `hybridauth_sid` 쿠키 값
///
/// 로그인 성공 시에는 이 값을 재사용하지 않고 새 세션 ID를 발급합니다.
fn incoming_session_id(req: &HttpRequest) -> Option<String> {
    req.cookie(SessionConfig::COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

/// 로그인용 세션 ID 쌍 `(이전, 새 ID)`
///
/// 새 ID는 항상 서버가 발급합니다. 이전 ID는 로그아웃 대상일 뿐입니다.
fn rotate_session_id(incoming: Option<String>) -> (Option<String>, String) {
    (incoming, generate_opaque_id())
}

/// attach 대상이 되는 현재 로그인 사용자
async fn current_user(state: &AppState, session_id: Option<&str>) -> AppResult<User> {
    let session_id = session_id
        .ok_or_else(|| AppError::AuthenticationError("로그인이 필요합니다".to_string()))?;

    let user_id = state
        .session(session_id)
        .current_user_id()
        .await?
        .ok_or_else(|| AppError::AuthenticationError("세션이 만료되었습니다".to_string()))?;

    state
        .store
        .find_by_id(&user_id)
        .await?
        .ok_or_else(|| AppError::AuthenticationError("세션 사용자를 찾을 수 없습니다".to_string()))
}

fn session_cookie(state: &AppState, session_id: String) -> Cookie<'static> {
    Cookie::build(SessionConfig::COOKIE_NAME, session_id)
        .path("/")
        .http_only(true)
        .secure(state.secure_cookies)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(state.session_ttl_seconds as i64))
        .finish()
}

fn error_redirect(record: &OAuthStateRecord, error: &AppError) -> HttpResponse {
    log::info!(
        "외부 인증 실패 리다이렉트: provider={}, method={}, code={}",
        record.provider, record.method.as_str(), error.code()
    );

    HttpResponse::Found()
        .insert_header((header::LOCATION, HybridauthApp::error_redirect(&record.redirect, error)))
        .finish()
}
