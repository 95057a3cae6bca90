//! HTTP client for the official news page.

use std::time::Duration;

use palwiki_core::CandidateUpdate;
use reqwest::{Client, Url};
use scraper::Html;

use crate::error::ScraperError;
use crate::extract::extract_updates;

/// Fetches the news page and hands back a parsed document.
///
/// One GET per call and no retries: a failed fetch fails the current
/// ingestion cycle and the next scheduled cycle tries again.
pub struct NewsClient {
    client: Client,
}

impl NewsClient {
    /// Creates a `NewsClient` with configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Downloads `url` and parses the body as an HTML document.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`] if `url` does not parse.
    /// - [`ScraperError::UnexpectedStatus`] on any non-2xx status.
    /// - [`ScraperError::Http`] on network, TLS, timeout, or body-read failure.
    pub async fn fetch_document(&self, url: &str) -> Result<Html, ScraperError> {
        let parsed = Url::parse(url).map_err(|e| ScraperError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;

        let response = self
            .client
            .get(parsed)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.text().await?;
        Ok(Html::parse_document(&body))
    }

    /// Fetches `url` and extracts every news card on the page, in document order.
    ///
    /// The parsed document never lives across an await point, so the returned
    /// future is `Send`.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`NewsClient::fetch_document`].
    pub async fn fetch_updates(&self, url: &str) -> Result<Vec<CandidateUpdate>, ScraperError> {
        let document = self.fetch_document(url).await?;
        let updates = extract_updates(&document);
        tracing::debug!(url, count = updates.len(), "scraper: extracted news cards");
        Ok(updates)
    }
}
