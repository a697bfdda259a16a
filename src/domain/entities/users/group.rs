use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// 사용자 그룹 (`groups` 컬렉션)
///
/// 그룹 관리는 이 서비스의 범위 밖이며, 자동 가입 시 기본 그룹을 이름으로 조회만 합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// 그룹명 (unique)
    pub name: String,
}

impl Group {
    /// 자동 가입 사용자가 소속되는 기본 그룹명
    pub const DEFAULT_NAME: &'static str = "Users";

    pub fn new(name: &str) -> Self {
        Self {
            id: ObjectId::new(),
            name: name.to_string(),
        }
    }
}
