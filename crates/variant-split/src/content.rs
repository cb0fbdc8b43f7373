//! Per-variant copy used by the rewriter.
//!
//! The table is immutable once loaded. It comes either from a JSON file
//! (`{"variants": {"<url>": {"pageTitle": ..., ...}}}`) or from the two
//! built-in entries for the hosted variants.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Base URL of the hosted variant pages.
pub const HOSTED_VARIANTS_BASE: &str = "https://cfw-takehome.developers.workers.dev/variants";

/// Replacement copy for one variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantContent {
    /// Text for `<title>`.
    pub page_title: String,
    /// Text for `h1#title`.
    pub title: String,
    /// Text for `p#description`.
    pub description: String,
    /// Text for `a#url`.
    pub link_text: String,
    /// `href` for `a#url`.
    pub link_url: String,
}

/// Immutable mapping from variant URL to its copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentTable {
    variants: BTreeMap<String, VariantContent>,
}

impl ContentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with_variant(mut self, url: impl Into<String>, content: VariantContent) -> Self {
        self.variants.insert(url.into(), content);
        self
    }

    /// Look up a variant's copy. A miss must be handled by the caller.
    pub fn get(&self, url: &str) -> Option<&VariantContent> {
        self.variants.get(url)
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &VariantContent)> {
        self.variants.iter().map(|(url, c)| (url.as_str(), c))
    }

    /// The two hosted variants.
    pub fn builtin() -> Self {
        Self::new()
            .with_variant(
                format!("{HOSTED_VARIANTS_BASE}/1"),
                VariantContent {
                    page_title: "Variant One".into(),
                    title: "You landed on variant one".into(),
                    description: "Half of all visitors see this page. Refresh and you will stay here."
                        .into(),
                    link_text: "Read about Workers".into(),
                    link_url: "https://developers.cloudflare.com/workers/".into(),
                },
            )
            .with_variant(
                format!("{HOSTED_VARIANTS_BASE}/2"),
                VariantContent {
                    page_title: "Variant Two".into(),
                    title: "You landed on variant two".into(),
                    description: "The other half of visitors see this page. Your cookie keeps you here."
                        .into(),
                    link_text: "Read about HTMLRewriter".into(),
                    link_url: "https://developers.cloudflare.com/workers/runtime-apis/html-rewriter/"
                        .into(),
                },
            )
    }

    /// Parse and validate a table from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let table: ContentTable =
            serde_json::from_str(json).context("content table is not valid JSON")?;
        table.validate()?;
        Ok(table)
    }

    /// Load and validate a table from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read content table: {}", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("invalid content table: {}", path.display()))
    }

    /// Every key must be an absolute http(s) URL usable as a cookie value.
    fn validate(&self) -> Result<()> {
        if self.variants.is_empty() {
            bail!("content table has no variants");
        }
        for url in self.variants.keys() {
            let parsed =
                url::Url::parse(url).with_context(|| format!("variant key {url:?} is not a URL"))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                bail!("variant key {url:?} must use http or https");
            }
            if !crate::cookie::is_cookie_value_safe(url) {
                bail!("variant key {url:?} cannot be stored in a cookie");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "variants": {
                "https://a.test/variants/1": {
                    "pageTitle": "A page",
                    "title": "A title",
                    "description": "A description",
                    "linkText": "A link",
                    "linkUrl": "https://a.test/more"
                }
            }
        }"#
    }

    #[test]
    fn test_builtin_has_both_hosted_variants() {
        let table = ContentTable::builtin();
        assert_eq!(table.len(), 2);
        assert!(table.get(&format!("{HOSTED_VARIANTS_BASE}/1")).is_some());
        assert!(table.get(&format!("{HOSTED_VARIANTS_BASE}/2")).is_some());
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_parse_camel_case_fields() {
        let table = ContentTable::from_json_str(sample_json()).unwrap();
        let content = table.get("https://a.test/variants/1").unwrap();
        assert_eq!(content.page_title, "A page");
        assert_eq!(content.link_text, "A link");
        assert_eq!(content.link_url, "https://a.test/more");
    }

    #[test]
    fn test_lookup_miss_is_none() {
        let table = ContentTable::from_json_str(sample_json()).unwrap();
        assert!(table.get("https://a.test/variants/2").is_none());
    }

    #[test]
    fn test_rejects_empty_table() {
        let err = ContentTable::from_json_str(r#"{"variants": {}}"#).unwrap_err();
        assert!(err.to_string().contains("no variants"));
    }

    #[test]
    fn test_rejects_relative_key() {
        let json = sample_json().replace("https://a.test/variants/1", "/variants/1");
        assert!(ContentTable::from_json_str(&json).is_err());
    }

    #[test]
    fn test_rejects_cookie_unsafe_key() {
        let json = sample_json().replace("https://a.test/variants/1", "https://a.test/v;1");
        assert!(ContentTable::from_json_str(&json).is_err());
    }

    #[test]
    fn test_rejects_missing_field() {
        let json = sample_json().replace(r#""linkUrl": "https://a.test/more""#, r#""x": 1"#);
        assert!(ContentTable::from_json_str(&json).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.json");
        std::fs::write(&path, sample_json()).unwrap();
        let table = ContentTable::load(&path).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_load_missing_file_names_path() {
        let err = ContentTable::load(Path::new("/nonexistent/content.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/content.json"));
    }

    #[test]
    fn test_example_file_is_valid() {
        let table =
            ContentTable::from_json_str(include_str!("../config/content.example.json")).unwrap();
        assert_eq!(table, ContentTable::builtin());
    }
}
