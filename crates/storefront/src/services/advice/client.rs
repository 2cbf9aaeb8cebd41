//! Generative-language API client.
//!
//! Thin wrapper around the `generateContent` REST endpoint: one prompt in,
//! one block of text out.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;
use url::Url;

use crate::config::GeminiConfig;

use super::error::{AdviceError, ApiErrorResponse};
use super::types::{GenerateContentRequest, GenerateContentResponse};

const API_KEY_HEADER: &str = "x-goog-api-key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Generative-language API client.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    endpoint: Url,
    model: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.inner.endpoint.as_str())
            .field("model", &self.inner.model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns `AdviceError::InvalidApiKey` if the key cannot be sent as a
    /// header, `AdviceError::InvalidEndpoint` if the base URL and model do
    /// not form a URL, and `AdviceError::Http` if the HTTP client fails to
    /// build.
    pub fn new(config: &GeminiConfig, api_key: &SecretString) -> Result<Self, AdviceError> {
        let client = reqwest::Client::builder()
            .default_headers(default_headers(api_key)?)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Self::with_http_client(client, config)
    }

    /// Create a client around a preconfigured HTTP client.
    ///
    /// The HTTP client must already send the API key header.
    ///
    /// # Errors
    ///
    /// Returns `AdviceError::InvalidEndpoint` if the base URL and model do
    /// not form a URL.
    pub fn with_http_client(
        client: reqwest::Client,
        config: &GeminiConfig,
    ) -> Result<Self, AdviceError> {
        let endpoint = config
            .base_url
            .join(&format!("models/{}:generateContent", config.model))
            .map_err(|e| AdviceError::InvalidEndpoint(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(GeminiClientInner {
                client,
                endpoint,
                model: config.model.clone(),
            }),
        })
    }

    /// The full `generateContent` URL.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Generate text for a prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API returns an error
    /// status, the body cannot be parsed, or the model produced no text.
    #[instrument(skip(self, prompt), fields(model = %self.inner.model))]
    pub async fn generate(&self, prompt: &str) -> Result<String, AdviceError> {
        let request = GenerateContentRequest::from_prompt(prompt);

        let response = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(handle_error_status(status, response).await);
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| AdviceError::Parse(format!("Failed to parse response: {e}")))?;

        parsed.text().ok_or(AdviceError::EmptyResponse)
    }
}

/// Headers sent with every request.
///
/// # Errors
///
/// Returns `AdviceError::InvalidApiKey` if the key is not a valid header value.
pub fn default_headers(api_key: &SecretString) -> Result<HeaderMap, AdviceError> {
    let mut key = HeaderValue::from_str(api_key.expose_secret())
        .map_err(|_| AdviceError::InvalidApiKey)?;
    key.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(API_KEY_HEADER, key);
    Ok(headers)
}

/// Map an error status to an `AdviceError`.
async fn handle_error_status(
    status: reqwest::StatusCode,
    response: reqwest::Response,
) -> AdviceError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        return AdviceError::RateLimited(retry_after);
    }

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return AdviceError::Unauthorized("API key rejected".to_string());
    }

    match response.text().await {
        Ok(body) => {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .map_or(body, |api_error| api_error.error.message);
            AdviceError::Api {
                status: status.as_u16(),
                message,
            }
        }
        Err(e) => AdviceError::Http(e),
    }
}
