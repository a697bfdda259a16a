//! Database Connection Management Module
//!
//! MongoDB 연결을 관리합니다.
//! 사용자 등록은 `users`와 `hybridauth` 두 컬렉션에 걸친 트랜잭션으로 수행되므로
//! MongoDB는 replica set(또는 sharded cluster)으로 구성되어야 합니다.
//!
//! # 환경 변수 설정
//!
//! ```bash
//! export MONGODB_URI="mongodb://localhost:27017/?replicaSet=rs0"
//! export DATABASE_NAME="hybridauth"
//! ```

use mongodb::{Client, options::ClientOptions};
use log::info;
use crate::core::errors::AppError;

/// MongoDB 데이터베이스 연결 래퍼
#[derive(Clone)]
pub struct Database {
    /// MongoDB 클라이언트 인스턴스 (세션/트랜잭션 시작에 사용)
    client: Client,
    /// 사용할 데이터베이스 이름
    database_name: String,
}

impl Database {
    /// 새 MongoDB 데이터베이스 연결을 생성합니다.
    ///
    /// 클라이언트를 초기화하고 `ping`으로 연결 상태를 검증합니다.
    ///
    /// ## 사용 예제
    /// ```rust,ignore
    /// let database = Database::connect(&StorageConfig::mongodb_uri(), &StorageConfig::database_name()).await?;
    /// ```
    pub async fn connect(uri: &str, database_name: &str) -> Result<Self, AppError> {
        let mut client_options = ClientOptions::parse(uri).await?;

        // 모니터링 및 로깅에서 식별하기 위한 애플리케이션 이름
        client_options.app_name = Some("hybridauth".to_string());

        let client = Client::with_options(client_options)?;

        client
            .database(database_name)
            .run_command(mongodb::bson::doc! { "ping": 1 })
            .await?;

        info!("✅ MongoDB 연결 성공: {}", database_name);

        Ok(Self {
            client,
            database_name: database_name.to_string(),
        })
    }

    /// 리포지토리가 컬렉션에 접근할 때 사용하는 `mongodb::Database`
    pub fn get_database(&self) -> mongodb::Database {
        self.client.database(&self.database_name)
    }

    /// 세션/트랜잭션 시작을 위한 클라이언트
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }
}
