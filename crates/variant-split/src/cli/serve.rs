//! Start the edge server.

use crate::config::{ConfigOverrides, EdgeConfig};
use crate::pipeline::Pipeline;
use crate::server;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// Resolve configuration, load the content table, and serve.
pub async fn run(overrides: ConfigOverrides) -> Result<()> {
    let config = EdgeConfig::resolve(overrides)?;
    let table = config.load_content_table()?;

    let content = config
        .content_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in".to_string());

    info!("starting variant-split v{}", env!("CARGO_PKG_VERSION"));
    info!(
        variants_endpoint = %config.variants_endpoint,
        content = %content,
        variants = table.len(),
        timeout_ms = config.timeout_ms,
        "configuration loaded"
    );

    let pipeline = Arc::new(Pipeline::from_config(&config, Arc::new(table)));
    server::serve(config.bind, pipeline).await
}
