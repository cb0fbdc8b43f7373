//! Runtime configuration resolution.
//!
//! Each setting resolves as: explicit CLI value, then environment
//! variable, then built-in default.

use crate::content::ContentTable;
use anyhow::{bail, Context, Result};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const DEFAULT_BIND: &str = "127.0.0.1:8787";
pub const DEFAULT_VARIANTS_URL: &str = "https://cfw-takehome.developers.workers.dev/api/variants";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_USER_AGENT: &str = concat!("variant-split/", env!("CARGO_PKG_VERSION"));

pub const ENV_BIND: &str = "VARIANT_SPLIT_BIND";
pub const ENV_VARIANTS_URL: &str = "VARIANT_SPLIT_VARIANTS_URL";
pub const ENV_CONTENT: &str = "VARIANT_SPLIT_CONTENT";
pub const ENV_TIMEOUT_MS: &str = "VARIANT_SPLIT_TIMEOUT_MS";
pub const ENV_LOG_JSON: &str = "VARIANT_SPLIT_LOG_JSON";

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind: Option<String>,
    pub variants_url: Option<String>,
    pub content: Option<PathBuf>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct EdgeConfig {
    pub bind: SocketAddr,
    pub variants_endpoint: String,
    /// Content table file; `None` means the built-in table.
    pub content_path: Option<PathBuf>,
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl EdgeConfig {
    /// Resolve against the process environment.
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve against an arbitrary environment lookup.
    pub fn resolve_with(
        overrides: ConfigOverrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let bind_str = overrides
            .bind
            .or_else(|| env(ENV_BIND))
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind: SocketAddr = bind_str
            .trim()
            .parse()
            .with_context(|| format!("invalid bind address: {bind_str}"))?;

        let variants_endpoint = overrides
            .variants_url
            .or_else(|| env(ENV_VARIANTS_URL))
            .unwrap_or_else(|| DEFAULT_VARIANTS_URL.to_string());
        let parsed = url::Url::parse(&variants_endpoint)
            .with_context(|| format!("invalid variants URL: {variants_endpoint}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!("variants URL must use http or https: {variants_endpoint}");
        }

        let content_path = resolve_content_path(overrides.content, &env);

        let timeout_ms = match overrides.timeout_ms {
            Some(ms) => ms,
            None => match env(ENV_TIMEOUT_MS) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .with_context(|| format!("invalid {ENV_TIMEOUT_MS}: {raw}"))?,
                None => DEFAULT_TIMEOUT_MS,
            },
        };
        if timeout_ms == 0 {
            bail!("timeout must be greater than zero");
        }

        Ok(Self {
            bind,
            variants_endpoint,
            content_path,
            timeout_ms,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    /// Load the configured content table, or the built-in one.
    pub fn load_content_table(&self) -> Result<ContentTable> {
        load_table(self.content_path.as_deref())
    }
}

/// Content table file from the CLI value or the environment.
pub fn resolve_content_path(
    explicit: Option<PathBuf>,
    env: impl Fn(&str) -> Option<String>,
) -> Option<PathBuf> {
    explicit.or_else(|| env(ENV_CONTENT).map(PathBuf::from))
}

/// Content table for the offline commands. Server settings are not
/// resolved, so a bad bind address or variants URL cannot break them.
pub fn offline_content_table(explicit: Option<PathBuf>) -> Result<ContentTable> {
    offline_content_table_with(explicit, |key| std::env::var(key).ok())
}

pub fn offline_content_table_with(
    explicit: Option<PathBuf>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ContentTable> {
    load_table(resolve_content_path(explicit, env).as_deref())
}

fn load_table(path: Option<&Path>) -> Result<ContentTable> {
    match path {
        Some(path) => ContentTable::load(path),
        None => Ok(ContentTable::builtin()),
    }
}

/// Truthy environment flag (`1`, `true`, `yes`, `on`).
pub fn env_flag(key: &str) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}
