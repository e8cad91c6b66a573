//! Fetching listing pages over HTTP

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

use crate::error::LoadError;

/// Source of listing page HTML
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET `url` and return the response body
    async fn fetch(&self, url: &str) -> Result<String, LoadError>;
}

/// `PageFetcher` backed by reqwest.
///
/// Relative URLs are resolved against the page the loader is attached to,
/// the way a browser resolves `data-next-page`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpFetcher {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid base url: {}", base_url))?;

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("blog-pager/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a possibly relative page URL
    pub fn resolve(&self, url: &str) -> Result<Url, LoadError> {
        self.base_url.join(url).map_err(|source| LoadError::InvalidUrl {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, LoadError> {
        let target = self.resolve(url)?;
        tracing::debug!("Fetching {}", target);

        let response = self
            .client
            .get(target.clone())
            .send()
            .await
            .map_err(|source| LoadError::Network {
                url: target.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                url: target.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| LoadError::Body {
            url: target.to_string(),
            source,
        })
    }
}
