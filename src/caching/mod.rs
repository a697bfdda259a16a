//! 캐싱 계층 모듈
//!
//! Redis를 세션 저장소와 OAuth state 저장소로 사용합니다.
//!
//! # 키 패턴
//!
//! - `session:{sid}` - 인증된 세션 레코드 (TTL: `SESSION_TTL_SECONDS`)
//! - `oauth_state:{state}` - 콜백까지 유지되는 일회용 state (TTL: `OAUTH_STATE_TTL_SECONDS`)
//!
//! # 환경 설정
//!
//! ```bash
//! REDIS_URL=redis://localhost:6379  # 기본값
//! ```

pub mod redis;
