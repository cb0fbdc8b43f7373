// Copyright 2026 Variant Split Contributors
// SPDX-License-Identifier: Apache-2.0

//! Variant Split: edge A/B content splitter.
//!
//! Every inbound request runs through a short sequential pipeline:
//! pick a variant (sticky via cookie) → fetch its HTML → build the
//! response → rewrite the variant's copy into the markup.

pub mod cli;
pub mod config;
pub mod content;
pub mod cookie;
pub mod error;
pub mod fetcher;
pub mod http_client;
pub mod logging;
pub mod pipeline;
pub mod response;
pub mod rewriter;
pub mod selector;
pub mod server;

pub use content::{ContentTable, VariantContent};
pub use error::{EdgeError, EdgeResult};
pub use pipeline::Pipeline;
