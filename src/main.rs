//! 외부 인증 연동 서비스 메인 애플리케이션
//!
//! Actix-web 기반의 HTTP 서버를 구동합니다.
//! 저장소(MongoDB 또는 메모리)와 Redis 연결을 만들고, 서비스를 생성자 주입으로 조립한 뒤
//! 외부 프로바이더 로그인/계정 연결 라우트를 제공합니다.

use std::sync::Arc;
use actix_web::{middleware, web, App, HttpServer};
use actix_governor::{Governor, GovernorConfigBuilder};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info, warn};
use hybridauth_service::caching::redis::RedisClient;
use hybridauth_service::config::{Environment, HybridauthConfig, ServerConfig, SessionConfig, StorageBackend, StorageConfig};
use hybridauth_service::core::{AppError, AppState};
use hybridauth_service::db::Database;
use hybridauth_service::repositories::{memory::InMemoryIdentityStore, mongo_store::MongoIdentityStore, IdentityStore};
use hybridauth_service::routes::configure_all_routes;
use hybridauth_service::services::{
    auth::{HybridauthApp, OAuthStateStore, OidcEngine},
    identity::IdentityResolver,
};

/// Rate Limiting 설정 구조체
#[derive(Debug)]
struct RateLimitConfig {
    per_second: u64,
    burst_size: u32,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 환경 설정 및 로깅 초기화
    load_env_file();
    init_logging();

    info!("🚀 외부 인증 연동 서비스 시작중...");

    let state = build_app_state().await.map_err(|e| {
        error!("서비스 초기화 실패: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    start_http_server(state).await
}

/// 저장소, 세션, OAuth 엔진을 조립합니다.
async fn build_app_state() -> Result<AppState, AppError> {
    let hybridauth = HybridauthConfig::from_env()?;
    info!(
        "🔐 프로바이더: {:?}, 자동 가입: {}, 콜백: {}",
        hybridauth.provider_names(),
        hybridauth.allow_auto_register,
        hybridauth.callback_url
    );

    let store = initialize_identity_store().await?;

    info!("📡 Redis 연결 중...");
    let redis = RedisClient::connect(&StorageConfig::redis_url()).await?;

    let resolver = IdentityResolver::new(store.clone(), hybridauth.allow_auto_register);

    Ok(AppState {
        app: HybridauthApp::new(resolver),
        engine: Arc::new(OidcEngine::new(hybridauth)),
        states: OAuthStateStore::new(redis.clone(), SessionConfig::oauth_state_ttl_seconds()),
        store,
        redis,
        session_ttl_seconds: SessionConfig::session_ttl_seconds(),
        secure_cookies: Environment::current().requires_secure_cookies(),
    })
}

/// `STORAGE_BACKEND`에 따라 식별 정보 저장소를 만듭니다.
///
/// MongoDB 백엔드는 시작 시 인덱스를 생성합니다.
async fn initialize_identity_store() -> Result<Arc<dyn IdentityStore>, AppError> {
    let backend = StorageConfig::backend().map_err(AppError::InternalError)?;

    match backend {
        StorageBackend::MongoDb => {
            info!("📡 데이터베이스 연결 중...");
            let database = Arc::new(
                Database::connect(&StorageConfig::mongodb_uri(), &StorageConfig::database_name()).await?
            );

            let store = MongoIdentityStore::new(database);
            store.create_indexes().await?;

            Ok(Arc::new(store))
        }
        StorageBackend::Memory => {
            warn!("⚠️ 인메모리 저장소 사용: 재시작 시 데이터가 사라집니다");
            Ok(Arc::new(InMemoryIdentityStore::with_default_group()))
        }
    }
}

/// HTTP 서버를 구성하고 실행합니다
///
/// Rate Limiting, 로깅, 경로 정규화 미들웨어를 포함합니다.
///
/// # Errors
///
/// * `std::io::Error` - 포트 바인딩 실패 또는 서버 실행 오류
async fn start_http_server(state: AppState) -> std::io::Result<()> {
    let bind_address = format!("{}:{}", ServerConfig::host(), ServerConfig::port());

    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);

    // Rate Limiting 설정
    let rate_limit_config = load_rate_limit_config();
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(rate_limit_config.per_second)
        .burst_size(rate_limit_config.burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| std::io::Error::other("Rate Limiting 설정이 올바르지 않습니다"))?;

    info!(
        "🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개",
        rate_limit_config.per_second,
        rate_limit_config.burst_size
    );

    let state = web::Data::new(state);

    HttpServer::new(move || {
        App::new()
            // Rate Limiting 미들웨어 (가장 먼저 적용)
            .wrap(Governor::new(&governor_conf))
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .app_data(state.clone())
            .configure(configure_all_routes)
    })
        .bind(bind_address)?
        .workers(4) // 워커 스레드 수
        .run()
        .await
}

/// 환경별 설정 파일을 로드합니다
///
/// # Environment Variables
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    // 로거 초기화 전이므로 stderr로 직접 출력
    eprintln!("Current profile: {}", profile);

    match profile.as_str() {
        "prod" => if let Err(e) = dotenv::from_filename(".env.prod") {
            eprintln!(".env.prod 파일 로드 실패: {}", e);
        },
        "dev" => if let Err(e) = dotenv::from_filename(".env.dev") {
            eprintln!(".env.dev 파일 로드 실패: {}", e);
        },
        _ => {
            dotenv().ok();
        }
    }
}

/// 로깅 시스템을 초기화합니다
///
/// * `RUST_LOG` - 로깅 레벨 설정 (기본값: "info,actix_web=debug")
///
/// ```bash
/// RUST_LOG=hybridauth_service::services=debug cargo run
/// ```
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=debug"));
}

/// 환경변수에서 Rate Limiting 설정을 로드합니다
///
/// * `RATE_LIMIT_PER_SECOND` - 초당 허용 요청 수 (기본값: 100)
/// * `RATE_LIMIT_BURST_SIZE` - 버스트 허용량 (기본값: 200)
fn load_rate_limit_config() -> RateLimitConfig {
    let per_second = std::env::var("RATE_LIMIT_PER_SECOND")
        .unwrap_or_else(|_| "100".to_string())
        .parse::<u64>()
        .unwrap_or_else(|e| {
            error!("RATE_LIMIT_PER_SECOND 파싱 실패: {}. 기본값 100 사용", e);
            100
        });

    let burst_size = std::env::var("RATE_LIMIT_BURST_SIZE")
        .unwrap_or_else(|_| "200".to_string())
        .parse::<u32>()
        .unwrap_or_else(|e| {
            error!("RATE_LIMIT_BURST_SIZE 파싱 실패: {}. 기본값 200 사용", e);
            200
        });

    let config = RateLimitConfig {
        per_second,
        burst_size,
    };

    info!("Rate Limiting 설정 로드됨: {:?}", config);
    config
}
