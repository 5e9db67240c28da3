//! External catalog collaborator. The application only reads title
//! summaries from it; nothing here is persisted except through the
//! metadata store when a user adds a title to their list.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleSummary {
    pub id: i64,
    pub title: String,
    pub genre: String,
    pub year: i64,
    pub synopsis: String,
}

#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn popular(&self) -> anyhow::Result<Vec<TitleSummary>>;
    async fn trending(&self) -> anyhow::Result<Vec<TitleSummary>>;
    async fn seasonal(&self) -> anyhow::Result<Vec<TitleSummary>>;
    async fn all_titles(&self) -> anyhow::Result<Vec<TitleSummary>>;
}

/// HTTP client for the catalog service. Endpoints are
/// `{base_url}/popular`, `/trending`, `/seasonal` and `/all`, each
/// returning a JSON array of title summaries.
pub struct HttpCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalog {
    pub fn new(base_url: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch(&self, path: &str) -> anyhow::Result<Vec<TitleSummary>> {
        let url = format!("{}/{}", self.base_url, path);
        let titles = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<TitleSummary>>()
            .await?;
        Ok(titles)
    }
}

#[async_trait]
impl CatalogClient for HttpCatalog {
    async fn popular(&self) -> anyhow::Result<Vec<TitleSummary>> {
        self.fetch("popular").await
    }
    async fn trending(&self) -> anyhow::Result<Vec<TitleSummary>> {
        self.fetch("trending").await
    }
    async fn seasonal(&self) -> anyhow::Result<Vec<TitleSummary>> {
        self.fetch("seasonal").await
    }
    async fn all_titles(&self) -> anyhow::Result<Vec<TitleSummary>> {
        self.fetch("all").await
    }
}

/// In-memory catalog serving a fixed list, for tests and local runs
/// without the external service.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    titles: Vec<TitleSummary>,
}

impl StaticCatalog {
    pub fn new(titles: Vec<TitleSummary>) -> Self {
        Self { titles }
    }

    pub fn sample() -> Self {
        Self::new(vec![
            TitleSummary {
                id: 42,
                title: "Cowboy Bebop".into(),
                genre: "Sci-Fi".into(),
                year: 1998,
                synopsis: "Bounty hunters drift through the solar system.".into(),
            },
            TitleSummary {
                id: 101,
                title: "Frieren".into(),
                genre: "Fantasy".into(),
                year: 2023,
                synopsis: "An elf mage outlives her companions.".into(),
            },
        ])
    }
}

#[async_trait]
impl CatalogClient for StaticCatalog {
    async fn popular(&self) -> anyhow::Result<Vec<TitleSummary>> {
        Ok(self.titles.clone())
    }
    async fn trending(&self) -> anyhow::Result<Vec<TitleSummary>> {
        Ok(self.titles.clone())
    }
    async fn seasonal(&self) -> anyhow::Result<Vec<TitleSummary>> {
        Ok(self.titles.clone())
    }
    async fn all_titles(&self) -> anyhow::Result<Vec<TitleSummary>> {
        Ok(self.titles.clone())
    }
}
