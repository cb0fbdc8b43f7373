//! Async HTTP client wrapping reqwest.
//!
//! One attempt per call: no retry, no backoff. Every request carries the
//! configured timeout; transport failures become
//! [`EdgeError::UpstreamUnavailable`].

use crate::error::{EdgeError, EdgeResult};
use std::time::Duration;

/// Content type sent with variant fetches and returned to clients.
pub const HTML_CONTENT_TYPE: &str = "text/html;charset=UTF-8";

/// Response from an HTTP GET request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Final URL after redirects.
    pub final_url: String,
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client shared by the variant selector and the content fetcher.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    /// Create a client with the given per-request timeout and user agent.
    pub fn new(timeout_ms: u64, user_agent: &str) -> Self {
        let timeout = Duration::from_millis(timeout_ms);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(user_agent)
            .build()
            .unwrap_or_default();

        Self { client, timeout }
    }

    /// Perform a single GET request and read the whole body as text.
    ///
    /// The status code is reported, not interpreted: callers decide what
    /// a non-2xx response means for them.
    pub async fn get(&self, url: &str, headers: &[(&str, &str)]) -> EdgeResult<HttpResponse> {
        let mut builder = self.client.get(url).timeout(self.timeout);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let r = builder
            .send()
            .await
            .map_err(|e| EdgeError::upstream(url, e))?;
        let status = r.status().as_u16();
        let final_url = r.url().to_string();
        let body = r.text().await.map_err(|e| EdgeError::upstream(url, e))?;

        Ok(HttpResponse {
            final_url,
            status,
            body,
        })
    }
}
