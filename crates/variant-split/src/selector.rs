//! Variant selection with sticky assignment.
//!
//! A well-formed `variant` cookie short-circuits selection: the visitor
//! keeps the variant they were given and the variants API is not called.
//! Otherwise the full list is fetched and one entry is drawn uniformly.

use crate::cookie::{self, VARIANT_COOKIE};
use crate::error::{EdgeError, EdgeResult};
use crate::http_client::HttpClient;
use axum::http::HeaderMap;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// Body of the variants API.
#[derive(Debug, Deserialize)]
struct VariantList {
    variants: Vec<String>,
}

/// Pick a uniformly random element. `None` on an empty slice.
pub fn get_random_element<'a, T, R: Rng + ?Sized>(list: &'a [T], rng: &mut R) -> Option<&'a T> {
    list.choose(rng)
}

/// Source of the random draw between candidates.
pub trait VariantPicker: Send + Sync {
    fn pick<'a>(&self, candidates: &'a [String]) -> Option<&'a String>;
}

/// Uniform draw from the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct UniformPicker;

impl VariantPicker for UniformPicker {
    fn pick<'a>(&self, candidates: &'a [String]) -> Option<&'a String> {
        get_random_element(candidates, &mut rand::thread_rng())
    }
}

/// The variant resolved for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub url: String,
    /// Came from the visitor's cookie rather than a fresh draw.
    pub sticky: bool,
}

/// Resolves the active variant for a request.
#[derive(Clone)]
pub struct VariantSelector {
    client: HttpClient,
    endpoint: String,
    picker: Arc<dyn VariantPicker>,
}

impl VariantSelector {
    pub fn new(client: HttpClient, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            picker: Arc::new(UniformPicker),
        }
    }

    /// Replace the random source.
    pub fn with_picker(mut self, picker: Arc<dyn VariantPicker>) -> Self {
        self.picker = picker;
        self
    }

    /// Candidate variant URLs for this request.
    ///
    /// A sticky cookie yields exactly that URL; otherwise the full list
    /// from the variants API, in API order.
    pub async fn candidates(&self, headers: &HeaderMap) -> EdgeResult<Vec<String>> {
        match sticky_variant(headers) {
            Some(url) => Ok(vec![url]),
            None => self.fetch_variant_list().await,
        }
    }

    /// Resolve exactly one variant for this request.
    pub async fn select(&self, headers: &HeaderMap) -> EdgeResult<Selection> {
        if let Some(url) = sticky_variant(headers) {
            debug!(variant = %url, "reusing variant from cookie");
            return Ok(Selection { url, sticky: true });
        }

        let list = self.fetch_variant_list().await?;
        let url = self
            .picker
            .pick(&list)
            .cloned()
            .ok_or_else(|| EdgeError::EmptyVariantList {
                url: self.endpoint.clone(),
            })?;
        debug!(variant = %url, candidates = list.len(), "drew new variant");
        Ok(Selection { url, sticky: false })
    }

    /// Fetch and parse the variants API.
    pub async fn fetch_variant_list(&self) -> EdgeResult<Vec<String>> {
        let resp = self.client.get(&self.endpoint, &[]).await?;
        if !resp.is_success() {
            return Err(EdgeError::upstream(
                &self.endpoint,
                format!("status {}", resp.status),
            ));
        }
        let list: VariantList =
            serde_json::from_str(&resp.body).map_err(|e| EdgeError::MalformedVariantList {
                url: self.endpoint.clone(),
                reason: e.to_string(),
            })?;
        Ok(list.variants)
    }
}

/// The cookie-pinned variant, if present and well-formed.
///
/// Values that are empty, not cookie-safe, or not absolute http(s) URLs
/// are treated as absent.
pub fn sticky_variant(headers: &HeaderMap) -> Option<String> {
    let value = cookie::get_cookie(headers, VARIANT_COOKIE)?;
    let value = value.trim();
    if !cookie::is_cookie_value_safe(value) {
        return None;
    }
    let parsed = url::Url::parse(value).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    Some(value.to_string())
}
