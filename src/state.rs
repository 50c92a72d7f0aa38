use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::AppConfig;

/// Shared application state: the connection pool and the parsed config.
/// Constructed once in `main` and handed to every handler via axum state.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;
        Ok(Self { db, config })
    }

    /// Assemble state from an externally constructed pool, used by tests
    /// with a lazily connecting pool so they never touch a real database.
    pub fn from_parts(db: PgPool, config: Arc<AppConfig>) -> Self {
        Self { db, config }
    }
}
