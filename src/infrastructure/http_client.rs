//! HTTP client for fetching listing and detail pages
//!
//! Requests are sent one at a time with a fixed browser User-Agent. No
//! retry, no rate limiting: a failed request fails the run.

use std::time::Duration;
use reqwest::{Client, Response, header::{HeaderMap, HeaderValue, USER_AGENT}};
use anyhow::{Result, Context};
use async_trait::async_trait;

use crate::domain::services::PageFetcher;
use crate::infrastructure::config::HttpConfig;

/// reqwest-backed page fetcher
pub struct HttpClient {
    client: Client,
    config: HttpConfig,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: HttpConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .context("Invalid user agent")?
        );

        let mut builder = Client::builder()
            .default_headers(headers)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            });
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    /// Fetch a URL, failing on non-2xx statuses
    pub async fn get(&self, url: &str) -> Result<Response> {
        tracing::info!("Fetching URL: {}", url);

        let response = self.client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch URL: {url}"))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "HTTP request failed with status {}: {}",
                response.status(),
                url
            );
        }

        tracing::debug!("Successfully fetched: {} ({})", url, response.status());
        Ok(response)
    }

    /// Fetch URL and return text content
    pub async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.get(url).await?;
        let text = response.text().await
            .with_context(|| format!("Failed to read response body from: {url}"))?;

        tracing::debug!("Read {} chars from {}", text.len(), url);
        Ok(text)
    }

    /// Get the configuration
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        self.get_text(url).await
    }
}
