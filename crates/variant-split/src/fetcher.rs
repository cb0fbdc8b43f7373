//! Fetches the raw HTML of a chosen variant.

use crate::error::EdgeResult;
use crate::http_client::{HttpClient, HTML_CONTENT_TYPE};
use tracing::{debug, warn};

/// HTML body of a variant paired with the URL it was fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedVariant {
    pub text: String,
    pub url: String,
}

#[derive(Clone)]
pub struct ContentFetcher {
    client: HttpClient,
}

impl ContentFetcher {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// GET the variant page and return its body.
    ///
    /// The body is returned whatever the status code; a non-2xx status is
    /// only logged. The returned `url` is the requested one, not the
    /// post-redirect one, so cookie and content lookup stay keyed on it.
    pub async fn get_variant_text(&self, url: &str) -> EdgeResult<FetchedVariant> {
        let resp = self
            .client
            .get(url, &[("content-type", HTML_CONTENT_TYPE)])
            .await?;

        if !resp.is_success() {
            warn!(variant = %url, status = resp.status, "variant fetch returned non-success status");
        }
        if resp.final_url != url {
            debug!(variant = %url, final_url = %resp.final_url, "variant fetch was redirected");
        }
        debug!(variant = %url, bytes = resp.body.len(), "fetched variant body");

        Ok(FetchedVariant {
            text: resp.body,
            url: url.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_redirected_fetch_keeps_requested_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/variants/1"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("location", format!("{}/moved/1", server.uri()).as_str()),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/moved/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>moved</p>"))
            .expect(1)
            .mount(&server)
            .await;

        let requested = format!("{}/variants/1", server.uri());
        let fetcher = ContentFetcher::new(HttpClient::new(5_000, "variant-split-test"));
        let fetched = fetcher.get_variant_text(&requested).await.unwrap();

        assert_eq!(fetched.text, "<p>moved</p>");
        assert_eq!(fetched.url, requested);
    }
}
