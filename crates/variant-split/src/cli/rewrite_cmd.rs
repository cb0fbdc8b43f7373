//! Rewrite a local HTML file offline, without fetching anything.

use crate::config;
use crate::rewriter::ContentRewriter;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Print `html_path` rewritten with `variant_url`'s copy to stdout.
pub fn run(variant_url: &str, html_path: &Path, content: Option<PathBuf>) -> Result<()> {
    let table = config::offline_content_table(content)?;
    let html = std::fs::read_to_string(html_path)
        .with_context(|| format!("failed to read {}", html_path.display()))?;

    let rewritten = ContentRewriter::new(Arc::new(table)).rewrite_html(&html, variant_url)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(rewritten.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
