//! Redis에 저장되는 세션/상태 레코드

use serde::{Deserialize, Serialize};
use crate::domain::models::auth::auth_context::{AuthContext, AuthMethod};

/// 인증된 세션 레코드 (`session:{sid}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// 로컬 사용자 ObjectId (16진수)
    pub user_id: String,
    pub context: AuthContext,
    /// Unix timestamp (초)
    pub authorized_at: i64,
}

/// 인증 시작 시 저장했다가 콜백에서 한 번 소비하는 state (`oauth_state:{state}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthStateRecord {
    pub provider: String,
    pub method: AuthMethod,
    /// URL 인코딩된 상태 그대로의 리다이렉트 대상
    pub redirect: String,
}
