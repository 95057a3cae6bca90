//! HTTP client for the Gemini `generateContent` endpoint.
//!
//! Wraps `reqwest` with API-key handling and typed request/response bodies.
//! Non-2xx statuses surface as [`GeminiError::UnexpectedStatus`] with the
//! response body attached for diagnostics.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::GeminiError;
use crate::types::{GenerateContentRequest, GenerateContentResponse};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const API_KEY_HEADER: &str = "x-goog-api-key";

// Upstream error bodies can be large HTML pages; keep log lines bounded.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Client for a single Gemini model.
///
/// Use [`GeminiClient::new`] for production or [`GeminiClient::with_base_url`]
/// to point at a mock server in tests.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    endpoint: Url,
}

impl GeminiClient {
    /// Creates a client pointed at the public Gemini API.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, GeminiError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeminiError::InvalidBaseUrl`] if
    /// `base_url` does not form a valid endpoint URL.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GeminiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("palwiki/0.1 (guide-synthesis)")
            .build()?;

        let endpoint = format!(
            "{}/v1beta/models/{model}:generateContent",
            base_url.trim_end_matches('/')
        );
        let endpoint = Url::parse(&endpoint).map_err(|e| GeminiError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint,
        })
    }

    /// Sends `prompt` as a single-turn request and returns the generated text.
    ///
    /// # Errors
    ///
    /// - [`GeminiError::UnexpectedStatus`] on any non-2xx status.
    /// - [`GeminiError::EmptyResponse`] if the first candidate has no text.
    /// - [`GeminiError::Deserialize`] if the body is not the expected JSON.
    /// - [`GeminiError::Http`] on network, TLS, or timeout failure.
    pub async fn generate_content(&self, prompt: &str) -> Result<String, GeminiError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "gemini: non-success response");
            return Err(GeminiError::UnexpectedStatus {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| GeminiError::Deserialize {
                context: "generateContent".to_string(),
                source: e,
            })?;

        parsed
            .first_candidate_text()
            .ok_or(GeminiError::EmptyResponse)
    }

    /// The fully-resolved `generateContent` URL this client posts to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_includes_model_and_method() {
        let client = GeminiClient::with_base_url("k", "gemini-2.5-flash", 30, DEFAULT_BASE_URL)
            .expect("client construction should not fail");
        assert_eq!(
            client.endpoint().as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn endpoint_strips_trailing_slash_from_base() {
        let client = GeminiClient::with_base_url("k", "m", 30, "http://127.0.0.1:9000/")
            .expect("client construction should not fail");
        assert_eq!(
            client.endpoint().as_str(),
            "http://127.0.0.1:9000/v1beta/models/m:generateContent"
        );
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let result = GeminiClient::with_base_url("k", "m", 30, "not a url");
        assert!(matches!(result, Err(GeminiError::InvalidBaseUrl { .. })));
    }
}
