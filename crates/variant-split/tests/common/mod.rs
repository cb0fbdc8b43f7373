//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use variant_split::content::{ContentTable, VariantContent};
use variant_split::fetcher::ContentFetcher;
use variant_split::http_client::HttpClient;
use variant_split::rewriter::ContentRewriter;
use variant_split::selector::{VariantPicker, VariantSelector};
use variant_split::Pipeline;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const FIXTURE: &str = r#"<html><head><title>old</title></head><body><h1 id="title">x</h1><p id="description">y</p><a id="url">z</a></body></html>"#;

/// Always picks the candidate at a fixed index.
pub struct FixedPicker(pub usize);

impl VariantPicker for FixedPicker {
    fn pick<'a>(&self, candidates: &'a [String]) -> Option<&'a String> {
        candidates.get(self.0)
    }
}

pub fn variant_url(server: &MockServer, name: &str) -> String {
    format!("{}/variants/{name}", server.uri())
}

pub fn variants_endpoint(server: &MockServer) -> String {
    format!("{}/api/variants", server.uri())
}

pub fn content_for(name: &str) -> VariantContent {
    VariantContent {
        page_title: format!("Page {name}"),
        title: format!("Title {name}"),
        description: format!("Description {name}"),
        link_text: format!("Link {name}"),
        link_url: format!("https://example.test/{name}"),
    }
}

/// Content table with entries for variants `a` and `b` on `server`.
pub fn table_for(server: &MockServer) -> ContentTable {
    ContentTable::new()
        .with_variant(variant_url(server, "a"), content_for("A"))
        .with_variant(variant_url(server, "b"), content_for("B"))
}

pub fn pipeline_with(server: &MockServer, picker: Arc<dyn VariantPicker>) -> Pipeline {
    let client = HttpClient::new(5_000, "variant-split-test");
    Pipeline::new(
        VariantSelector::new(client.clone(), variants_endpoint(server)).with_picker(picker),
        ContentFetcher::new(client),
        ContentRewriter::new(Arc::new(table_for(server))),
    )
}

pub fn pipeline(server: &MockServer) -> Pipeline {
    pipeline_with(server, Arc::new(FixedPicker(0)))
}

pub async fn mount_variant_list(server: &MockServer, urls: &[String], expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/api/variants"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "variants": urls })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

pub async fn mount_variant_page(server: &MockServer, name: &str, status: u16, html: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/variants/{name}")))
        .and(header("content-type", "text/html;charset=UTF-8"))
        .respond_with(ResponseTemplate::new(status).set_body_raw(html, "text/html"))
        .mount(server)
        .await;
}

/// Variant page that must not be requested at all.
pub async fn mount_unfetched_variant_page(server: &MockServer, name: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/variants/{name}")))
        .respond_with(ResponseTemplate::new(200).set_body_raw(FIXTURE, "text/html"))
        .expect(0)
        .mount(server)
        .await;
}

pub async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn text_of(html: &str, css: &str) -> String {
    let doc = scraper::Html::parse_document(html);
    let sel = scraper::Selector::parse(css).unwrap();
    doc.select(&sel).next().unwrap().text().collect()
}

pub fn attr_of(html: &str, css: &str, attr: &str) -> Option<String> {
    let doc = scraper::Html::parse_document(html);
    let sel = scraper::Selector::parse(css).unwrap();
    doc.select(&sel)
        .next()
        .unwrap()
        .value()
        .attr(attr)
        .map(String::from)
}
