//! AI styling advice.
//!
//! Shoppers ask a free-text question about a product and get a short answer
//! from a generative model. Every failure collapses into a fixed sentence so
//! the caller always has something to show; the underlying error is logged.

mod client;
mod error;
mod types;

use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, error, info};

pub use client::{GeminiClient, default_headers};
pub use error::{AdviceError, ApiError, ApiErrorResponse};
pub use types::{Candidate, Content, GenerateContentRequest, GenerateContentResponse, Part, StylingRequest};

use crate::config::GeminiConfig;
use crate::models::Product;

/// Shown when no API key is configured.
pub const OFFLINE_MESSAGE: &str =
    "Our AI Stylist is currently offline. Please contact support for assistance.";

/// Shown when the request fails for any reason other than an empty answer.
pub const CONNECTION_FAILURE_MESSAGE: &str =
    "I'm having trouble connecting to the styling server. Please try again later.";

/// Shown when the model answered with no text.
pub const EMPTY_RESPONSE_MESSAGE: &str = "I'm sorry, I couldn't generate a styling tip right now.";

const CACHE_CAPACITY: u64 = 1_000;
const CACHE_TTL: Duration = Duration::from_secs(300);

/// Answers styling questions, caching recent answers per product and question.
#[derive(Clone)]
pub struct StylistService {
    client: Option<GeminiClient>,
    cache: Cache<(String, String), String>,
}

impl std::fmt::Debug for StylistService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StylistService")
            .field("client", &self.client)
            .field("cached", &self.cache.entry_count())
            .finish()
    }
}

impl StylistService {
    /// Build from configuration.
    ///
    /// Offline when no API key is set, or when the configured key cannot be
    /// used to build a client; the latter is logged.
    #[must_use]
    pub fn new(config: &GeminiConfig) -> Self {
        let Some(key) = &config.api_key else {
            info!("No Gemini API key configured, stylist is offline");
            return Self::offline();
        };
        match GeminiClient::new(config, key) {
            Ok(client) => Self::with_client(client),
            Err(e) => {
                error!(error = %e, "Could not build Gemini client, stylist is offline");
                Self::offline()
            }
        }
    }

    /// A stylist that always answers with [`OFFLINE_MESSAGE`].
    #[must_use]
    pub fn offline() -> Self {
        Self::build(None)
    }

    #[must_use]
    pub fn with_client(client: GeminiClient) -> Self {
        Self::build(Some(client))
    }

    fn build(client: Option<GeminiClient>) -> Self {
        Self {
            client,
            cache: Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(CACHE_TTL)
                .build(),
        }
    }

    #[must_use]
    pub const fn is_online(&self) -> bool {
        self.client.is_some()
    }

    /// Answer `question` about a product.
    ///
    /// A blank question yields an empty string without contacting anyone.
    pub async fn advise(&self, product_name: &str, product_description: &str, question: &str) -> String {
        if question.trim().is_empty() {
            return String::new();
        }
        let Some(client) = &self.client else {
            return OFFLINE_MESSAGE.to_string();
        };

        let key = (product_name.to_string(), question.trim().to_string());
        if let Some(cached) = self.cache.get(&key).await {
            debug!(product = %product_name, "Styling advice served from cache");
            return cached;
        }

        let request = StylingRequest {
            product_name,
            product_description,
            question,
        };

        match client.generate(&request.prompt()).await {
            Ok(answer) => {
                self.cache.insert(key, answer.clone()).await;
                answer
            }
            Err(AdviceError::EmptyResponse) => {
                debug!(product = %product_name, "Model returned no text");
                EMPTY_RESPONSE_MESSAGE.to_string()
            }
            Err(e) => {
                error!(error = %e, product = %product_name, "Styling advice request failed");
                CONNECTION_FAILURE_MESSAGE.to_string()
            }
        }
    }

    /// [`advise`](Self::advise) using a catalog product's name and description.
    pub async fn advise_on(&self, product: &Product, question: &str) -> String {
        self.advise(&product.name, &product.description, question).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use url::Url;

    use super::*;

    fn config_for(addr: std::net::SocketAddr) -> GeminiConfig {
        GeminiConfig {
            api_key: Some(SecretString::from("test-key")),
            model: "gemini-2.5-flash".to_string(),
            base_url: Url::parse(&format!("http://{addr}/v1beta/")).unwrap(),
        }
    }

    fn local_client(config: &GeminiConfig) -> GeminiClient {
        let key = config.api_key.as_ref().unwrap();
        let http = reqwest::Client::builder()
            .no_proxy()
            .default_headers(default_headers(key).unwrap())
            .build()
            .unwrap();
        GeminiClient::with_http_client(http, config).unwrap()
    }

    /// Serve `responses` to consecutive connections, returning the request
    /// heads that were received.
    async fn serve(
        responses: Vec<(u16, &'static str)>,
    ) -> (std::net::SocketAddr, tokio::task::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let mut seen = Vec::new();
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                seen.push(read_request(&mut socket).await);
                let reply = format!(
                    "HTTP/1.1 {status} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(reply.as_bytes()).await.unwrap();
                socket.shutdown().await.ok();
            }
            seen
        });
        (addr, handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0_u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())?
                    })
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    const ANSWER: &str = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Wear it with brown oxfords."}]},"finishReason":"STOP"}]}"#;

    #[tokio::test]
    async fn test_offline_stylist_returns_fixed_message() {
        let stylist = StylistService::new(&GeminiConfig::default());
        assert!(!stylist.is_online());
        assert_eq!(
            stylist.advise("Midnight Navy Tuxedo", "Elegant", "What shoes?").await,
            "Our AI Stylist is currently offline. Please contact support for assistance."
        );
    }

    #[tokio::test]
    async fn test_unusable_key_falls_back_to_offline() {
        let config = GeminiConfig {
            api_key: Some(SecretString::from("abc\rdef")),
            ..GeminiConfig::default()
        };
        let stylist = StylistService::new(&config);
        assert!(!stylist.is_online());
        assert_eq!(stylist.advise("Suit", "Desc", "What tie?").await, OFFLINE_MESSAGE);
    }

    #[tokio::test]
    async fn test_blank_question_yields_empty_answer() {
        assert_eq!(StylistService::offline().advise("Suit", "Desc", "   ").await, "");
    }

    #[tokio::test]
    async fn test_successful_answer_is_returned_and_cached() {
        let (addr, server) = serve(vec![(200, ANSWER)]).await;
        let config = config_for(addr);
        let stylist = StylistService::with_client(local_client(&config));

        let first = stylist.advise("Classic Charcoal Suit", "Wool", "What tie?").await;
        assert_eq!(first, "Wear it with brown oxfords.");

        // Served from cache; the server only accepts one connection.
        let second = stylist.advise("Classic Charcoal Suit", "Wool", " What tie? ").await;
        assert_eq!(second, first);

        let requests = server.await.unwrap();
        assert_eq!(requests.len(), 1);
        let request = requests[0].to_lowercase();
        assert!(request.starts_with("post /v1beta/models/gemini-2.5-flash:generatecontent"));
        assert!(request.contains("x-goog-api-key: test-key"));
        assert!(requests[0].contains("Classic Charcoal Suit"));
    }

    #[tokio::test]
    async fn test_empty_model_output_uses_apology() {
        let (addr, _server) = serve(vec![(200, r#"{"candidates":[]}"#)]).await;
        let stylist = StylistService::with_client(local_client(&config_for(addr)));
        assert_eq!(
            stylist.advise("Suit", "Desc", "Fit?").await,
            "I'm sorry, I couldn't generate a styling tip right now."
        );
    }

    #[tokio::test]
    async fn test_api_error_uses_connection_message() {
        let body = r#"{"error":{"code":500,"message":"Internal error","status":"INTERNAL"}}"#;
        let (addr, _server) = serve(vec![(500, body)]).await;
        let stylist = StylistService::with_client(local_client(&config_for(addr)));
        assert_eq!(stylist.advise("Suit", "Desc", "Fit?").await, CONNECTION_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_refused_connection_uses_connection_message() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let stylist = StylistService::with_client(local_client(&config_for(addr)));
        assert_eq!(
            stylist.advise("Suit", "Desc", "Fit?").await,
            "I'm having trouble connecting to the styling server. Please try again later."
        );
    }

    #[tokio::test]
    async fn test_client_maps_rate_limit_and_auth_errors() {
        let (addr, _server) = serve(vec![(429, "{}"), (403, "{}")]).await;
        let client = local_client(&config_for(addr));

        let err = client.generate("hello").await.unwrap_err();
        assert!(matches!(err, AdviceError::RateLimited(60)));

        let err = client.generate("hello").await.unwrap_err();
        assert!(matches!(err, AdviceError::Unauthorized(_)));
    }
}
