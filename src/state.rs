use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use time::Duration;

use crate::catalog::{CatalogClient, HttpCatalog};
use crate::config::AppConfig;
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub catalog: Arc<dyn CatalogClient>,
    pub sessions: SessionStore,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        // Foreign keys are off by default in SQLite; the list table relies
        // on them.
        let options = SqliteConnectOptions::from_str(&config.database_url)
            .context("parse DATABASE_URL")?
            .foreign_keys(true);
        let db = SqlitePoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await
            .context("connect to database")?;

        let catalog = Arc::new(HttpCatalog::new(
            &config.catalog.base_url,
            config.catalog.timeout_secs,
        )?) as Arc<dyn CatalogClient>;

        let sessions = SessionStore::new(Duration::minutes(config.session_ttl_minutes));

        Ok(Self {
            db,
            config,
            catalog,
            sessions,
        })
    }

    pub fn from_parts(
        db: SqlitePool,
        config: Arc<AppConfig>,
        catalog: Arc<dyn CatalogClient>,
        sessions: SessionStore,
    ) -> Self {
        Self {
            db,
            config,
            catalog,
            sessions,
        }
    }
}
