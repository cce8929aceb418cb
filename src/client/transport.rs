//! HTTP transport seam
//!
//! The client talks to the provider through this trait so tests can inject a
//! scripted transport. The real implementation is a thin reqwest wrapper.

use std::time::Duration;

use crate::error::Result;

/// Minimal HTTP response surface the client needs.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// 2xx success.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// HTTP 429, the provider's rate-limit signal.
    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }
}

/// Trait for HTTP data sources
///
/// Implementations own their own connection pooling and timeouts. Transport
/// failures (timeout, connection reset, DNS) surface as
/// [`crate::StatsError::Fetch`]; HTTP status handling is the caller's job so
/// the retry policy can distinguish rate limiting from other failures.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET request and return status plus body.
    async fn get(&self, url: &str) -> Result<HttpResponse>;
}

/// reqwest-backed transport with a bounded request timeout.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        let ok = HttpResponse { status: 200, body: String::new() };
        assert!(ok.is_success());
        assert!(!ok.is_rate_limited());

        let limited = HttpResponse { status: 429, body: String::new() };
        assert!(!limited.is_success());
        assert!(limited.is_rate_limited());

        let server_error = HttpResponse { status: 503, body: String::new() };
        assert!(!server_error.is_success());
        assert!(!server_error.is_rate_limited());
    }
}
