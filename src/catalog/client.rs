//! HTTP client for the lecture catalog endpoints.
//!
//! The catalog is split into two read-only partitions (majors and liberal
//! arts), each serving a JSON array of lectures. This client only knows how
//! to fetch one partition; once-per-session semantics live in the loader.

use super::error::CatalogError;
use super::types::Lecture;
use reqwest::Client;
use std::env;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Default base URL for the catalog endpoints.
const CATALOG_BASE_URL: &str = "http://localhost:8080";

/// Paths for the two catalog partitions.
const MAJORS_PATH: &str = "/schedules-majors.json";
const LIBERAL_ARTS_PATH: &str = "/schedules-liberal-arts.json";

/// Configuration for the catalog client.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL the partition paths are joined onto
    pub base_url: String,
    /// Path of the majors partition
    pub majors_path: String,
    /// Path of the liberal-arts partition
    pub liberal_arts_path: String,
    /// Connect timeout for the HTTP client
    pub connect_timeout: Duration,
    /// Total request timeout
    pub request_timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: CATALOG_BASE_URL.to_string(),
            majors_path: MAJORS_PATH.to_string(),
            liberal_arts_path: LIBERAL_ARTS_PATH.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl CatalogConfig {
    /// Builds a configuration from the environment, falling back to the
    /// defaults for anything unset.
    ///
    /// Recognized variables: `CATALOG_BASE_URL`, `CATALOG_MAJORS_PATH`,
    /// `CATALOG_LIBERAL_ARTS_PATH`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(base_url) = env::var("CATALOG_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(path) = env::var("CATALOG_MAJORS_PATH") {
            config.majors_path = path;
        }
        if let Ok(path) = env::var("CATALOG_LIBERAL_ARTS_PATH") {
            config.liberal_arts_path = path;
        }
        config
    }
}

/// Client for fetching lecture catalog partitions.
pub struct CatalogClient {
    client: Client,
    config: CatalogConfig,
}

impl CatalogClient {
    /// Creates a client with the default configuration.
    pub fn new() -> Result<Self, CatalogError> {
        Self::with_config(CatalogConfig::default())
    }

    /// Creates a client with custom configuration.
    pub fn with_config(config: CatalogConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| CatalogError::Network {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self { client, config })
    }

    /// Fetches the majors partition.
    pub async fn fetch_majors(&self) -> Result<Vec<Lecture>, CatalogError> {
        self.fetch_partition(&self.config.majors_path).await
    }

    /// Fetches the liberal-arts partition.
    pub async fn fetch_liberal_arts(&self) -> Result<Vec<Lecture>, CatalogError> {
        self.fetch_partition(&self.config.liberal_arts_path).await
    }

    /// Fetches one partition and decodes it.
    ///
    /// # Returns
    /// * `Ok(Vec<Lecture>)` - The partition's lectures in endpoint order
    /// * `Err(CatalogError)` - If the request fails, the status is not a
    ///   success, or the payload does not decode
    async fn fetch_partition(&self, path: &str) -> Result<Vec<Lecture>, CatalogError> {
        let url = Url::parse(&self.config.base_url)?.join(path)?;
        debug!(%url, "fetching catalog partition");

        let response = self.client.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(CatalogError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let text = response.text().await?;
        let lectures: Vec<Lecture> = serde_json::from_str(&text)?;

        info!(count = lectures.len(), %url, "loaded catalog partition");
        Ok(lectures)
    }
}
