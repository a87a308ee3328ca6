use std::sync::Arc;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub mod dto;
pub mod error;
pub mod models;
pub mod query;
pub mod repository;
pub mod services;
pub mod store;

use error::Result;
use repository::player_metric::PlayerMetricRepository;
use store::PgMetricStore;

#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Repository backed by this database's pool
    pub fn player_metrics(&self) -> PlayerMetricRepository {
        PlayerMetricRepository::new(Arc::new(PgMetricStore::new(self.pool.clone())))
    }
}
