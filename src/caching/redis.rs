//! Redis 클라이언트
//!
//! 세션 레코드와 일회용 OAuth state를 JSON으로 직렬화하여 TTL과 함께 저장합니다.

use redis::{AsyncCommands, Client};
use serde::{Serialize, de::DeserializeOwned};

/// JSON 직렬화를 내장한 Redis 래퍼
#[derive(Clone)]
pub struct RedisClient {
    client: Client,
}

impl RedisClient {
    /// 연결을 열고 `PING`으로 서버 가용성을 확인합니다.
    pub async fn connect(redis_url: &str) -> Result<Self, redis::RedisError> {
        let client = Client::open(redis_url)?;

        let mut conn = client.get_multiplexed_async_connection().await?;
        redis::cmd("PING").query_async::<()>(&mut conn).await?;

        log::info!("✅ Redis 연결 성공");

        Ok(Self { client })
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;

        value.map(|json| Self::decode(&json)).transpose()
    }

    pub async fn set_with_expiry<T: Serialize>(&self, key: &str, value: &T, seconds: u64) -> Result<(), redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let json = serde_json::to_string(value)
            .map_err(|e| redis::RedisError::from((redis::ErrorKind::TypeError, "Serialization failed", e.to_string())))?;
        conn.set_ex(key, json, seconds).await
    }

    /// 값을 읽는 즉시 삭제합니다 (`GETDEL`).
    ///
    /// OAuth state처럼 한 번만 소비되어야 하는 값에 사용합니다.
    pub async fn take<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get_del(key).await?;

        value.map(|json| Self::decode(&json)).transpose()
    }

    pub async fn del(&self, key: &str) -> Result<(), redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del(key).await
    }

    fn decode<T: DeserializeOwned>(json: &str) -> Result<T, redis::RedisError> {
        serde_json::from_str(json)
            .map_err(|e| redis::RedisError::from((redis::ErrorKind::TypeError, "Deserialization failed", e.to_string())))
    }
}
