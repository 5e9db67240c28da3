use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub catalog: CatalogConfig,
    pub session_ttl_minutes: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://otakulist.db?mode=rwc".into());
        let catalog = CatalogConfig {
            base_url: std::env::var("CATALOG_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:9000/catalog".into()),
            timeout_secs: std::env::var("CATALOG_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(10),
        };
        let session_ttl_minutes = std::env::var("SESSION_TTL_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(60 * 24);
        Ok(Self {
            database_url,
            catalog,
            session_ttl_minutes,
        })
    }
}
