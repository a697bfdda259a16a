//! # 고유 토큰 생성
//!
//! 외부 계정으로 자동 생성되는 로컬 계정의 로그인명, 사용자명,
//! 그리고 세션 ID와 OAuth state 값을 만듭니다.
//! 토큰은 현재 시각(마이크로초)과 난수로 구성되며 외부 식별자를 포함하지 않습니다.

use chrono::Utc;
use uuid::Uuid;

/// `prefix` 뒤에 시간 기반 16진수와 난수 접미사를 붙인 토큰
///
/// ```rust,ignore
/// let login = generate_unique_token("user");   // user18c3f1a2b4d5e6a1f9c0d2e
/// let name = generate_unique_token("google");  // google18c3f1a2b4d5e7b7e1a94c
/// ```
pub fn generate_unique_token(prefix: &str) -> String {
    let micros = Utc::now().timestamp_micros();
    let entropy = Uuid::new_v4().simple().to_string();
    format!("{}{:x}{}", prefix, micros, &entropy[..8])
}

/// 쿠키/URL에 그대로 실을 수 있는 불투명 난수 값
pub fn generate_opaque_id() -> String {
    Uuid::new_v4().simple().to_string()
}
