//! HTTP seam for the CI server.
//!
//! Provides:
//! - HttpClient trait: the single GET the pipeline needs
//! - ReqwestClient: blocking client used in production
//!
//! Tests use `mock::MockHttp` instead.

use std::time::Duration;

use tracing::debug;

/// Status and body of a completed request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Build a response from a status and body
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Transport-level failures (no response was received)
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("HTTP client setup failed: {0}")]
    Setup(String),

    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },
}

/// Blocking GET interface
pub trait HttpClient {
    /// Fetch `url` and return the response whatever its status
    fn get(&self, url: &str) -> Result<HttpResponse, HttpError>;
}

/// Production client backed by `reqwest::blocking`
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Create a client. With `verify_tls == false` certificate validation
    /// is disabled, which some self-hosted CI servers require.
    pub fn new(verify_tls: bool) -> Result<Self, HttpError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("nightly-sideload/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(!verify_tls)
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| HttpError::Setup(e.to_string()))?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        debug!(url, "GET");
        let transport = |e: reqwest::Error| HttpError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let response = self.client.get(url).send().map_err(transport)?;
        let status = response.status().as_u16();
        let body = response.bytes().map_err(transport)?.to_vec();
        debug!(url, status, bytes = body.len(), "response");

        Ok(HttpResponse { status, body })
    }
}
