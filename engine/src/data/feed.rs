// Feed addresses and the transport that fetches their text.
use crate::error::EngineError;
use async_trait::async_trait;
use reqwest::Client;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    File(PathBuf),
    Http(String),
}

impl FeedSource {
    pub fn from_address(address: &str) -> Self {
        let address = address.trim();
        let lower = address.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            FeedSource::Http(address.to_string())
        } else {
            FeedSource::File(PathBuf::from(address))
        }
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedSource::File(path) => write!(f, "{}", path.display()),
            FeedSource::Http(url) => f.write_str(url),
        }
    }
}

/// Fetches the raw text of a feed. The only operation in the core that
/// suspends.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(&self, source: &FeedSource) -> Result<String, EngineError>;
}

/// Reads local files with `tokio::fs` and URLs with `reqwest`.
#[derive(Debug, Clone)]
pub struct DefaultFetcher {
    client: Client,
}

impl DefaultFetcher {
    pub fn new(timeout: Duration) -> Result<Self, EngineError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self::with_client(client))
    }

    /// Uses a caller-built client, e.g. one with proxy or TLS settings.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FeedFetcher for DefaultFetcher {
    async fn fetch(&self, source: &FeedSource) -> Result<String, EngineError> {
        match source {
            FeedSource::File(path) => {
                let bytes = tokio::fs::read(path).await?;
                String::from_utf8(bytes)
                    .map_err(|_| EngineError::CsvDataFormatError(format!("Feed '{}' is not valid UTF-8", path.display())))
            }
            FeedSource::Http(url) => {
                let response = self.client.get(url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(EngineError::HttpStatus { status: status.as_u16(), address: url.clone() });
                }
                Ok(response.text().await?)
            }
        }
    }
}
