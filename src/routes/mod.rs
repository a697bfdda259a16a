//! API 라우트 설정 모듈
//!
//! 외부 인증 라우트와 헬스체크 엔드포인트를 등록합니다.
//!
//! | 메서드 | 경로 | 핸들러 |
//! |--------|------|--------|
//! | GET | `/health` | [`health_check`] |
//! | GET | `/hybridauth/callback` | [`handlers::hybridauth::callback`] |
//! | GET | `/hybridauth/{provider}/{method}` | [`handlers::hybridauth::authorize`] |
//!
//! # Examples
//!
//! ```rust,ignore
//! use actix_web::{web, App};
//!
//! let app = App::new()
//!     .app_data(web::Data::new(state))
//!     .configure(configure_all_routes);
//! ```

use crate::handlers;
use actix_web::web;
use serde_json::json;

/// 모든 라우트를 설정합니다
pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check);

    configure_hybridauth_routes(cfg);
}

/// 외부 인증 라우트
///
/// 콜백 경로는 `config::CALLBACK_PATH`와 일치해야 합니다.
///
/// # Examples
///
/// ```bash
/// # Google 로그인 시작 (완료 후 /dashboard 로 이동)
/// curl -i "http://localhost:8080/hybridauth/google/auth?redirect=%2Fdashboard"
///
/// # 로그인한 세션에 GitLab 계정 연결
/// curl -i -b "hybridauth_sid=..." "http://localhost:8080/hybridauth/gitlab/attach?redirect=%2Fprofile"
/// ```
fn configure_hybridauth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/hybridauth")
            .service(handlers::hybridauth::callback)
            .service(handlers::hybridauth::authorize)
    );
}

/// 서비스 상태를 확인하는 헬스체크 엔드포인트
///
/// ```bash
/// curl http://localhost:8080/health
/// ```
#[actix_web::get("/health")]
async fn health_check() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "hybridauth_service",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
