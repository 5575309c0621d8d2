//! Where the viewer gets its snapshot from.
//!
//! `HttpHealthSource` issues `GET /api/health` against a base URL. `LocalHealthSource`
//! reads an in-process `HealthReporter` and cannot fail.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode, Url};

use crate::config::HEALTH_PATH;
use crate::health::{HealthReporter, HealthSnapshot};

/// Why a fetch failed. Kept for diagnostics; users only see a generic message.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("health request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("health endpoint returned {0}")]
    Status(StatusCode),

    #[error("health response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// Short label for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport(_) => "transport",
            FetchError::Status(_) => "status",
            FetchError::Decode(_) => "decode",
        }
    }
}

#[async_trait]
pub trait HealthSource: Send + Sync {
    async fn fetch(&self) -> Result<HealthSnapshot, FetchError>;

    /// Human-readable description for logs
    fn describe(&self) -> String;
}

/// Fetches snapshots from a remote health endpoint.
#[derive(Clone, Debug)]
pub struct HttpHealthSource {
    client: Client,
    url: Url,
}

impl HttpHealthSource {
    /// Builds a source for the health endpoint under `base`.
    pub fn new(base: &Url, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, health_url(base)))
    }

    pub fn with_client(client: Client, url: Url) -> Self {
        Self { client, url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// Resolves the health endpoint against a base URL.
///
/// The endpoint path is absolute, so any path on `base` is replaced.
pub fn health_url(base: &Url) -> Url {
    let mut url = base.clone();
    url.set_path(HEALTH_PATH);
    url.set_query(None);
    url.set_fragment(None);
    url
}

#[async_trait]
impl HealthSource for HttpHealthSource {
    async fn fetch(&self) -> Result<HealthSnapshot, FetchError> {
        let response = self
            .client
            .get(self.url.clone())
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await?;
        let snapshot = serde_json::from_slice(&body)?;
        Ok(snapshot)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

/// Reads the in-process reporter.
#[derive(Clone, Debug)]
pub struct LocalHealthSource {
    reporter: Arc<HealthReporter>,
}

impl LocalHealthSource {
    pub fn new(reporter: Arc<HealthReporter>) -> Self {
        Self { reporter }
    }
}

#[async_trait]
impl HealthSource for LocalHealthSource {
    async fn fetch(&self) -> Result<HealthSnapshot, FetchError> {
        Ok(self.reporter.snapshot())
    }

    fn describe(&self) -> String {
        "in-process".to_string()
    }
}
