// Copyright 2026 Variant Split Contributors
// SPDX-License-Identifier: Apache-2.0

//! The per-request pipeline.
//!
//! `SelectingVariant → Fetching → BuildingResponse → Rewriting → Done`.
//! Stages only move forward; the first error aborts the run. The variant
//! chosen in the first stage is threaded unchanged through the rest, and
//! its rewrite rules are resolved in that same stage so a variant missing
//! from the content table fails before anything is fetched.

use crate::config::EdgeConfig;
use crate::content::ContentTable;
use crate::error::EdgeResult;
use crate::fetcher::ContentFetcher;
use crate::http_client::HttpClient;
use crate::response::prepare_response;
use crate::rewriter::{rewrite_response, ContentRewriter};
use crate::selector::VariantSelector;
use axum::http::HeaderMap;
use axum::response::Response;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    SelectingVariant,
    Fetching,
    BuildingResponse,
    Rewriting,
    Done,
}

impl Stage {
    /// The following stage. `Done` is terminal.
    pub fn next(self) -> Self {
        match self {
            Stage::SelectingVariant => Stage::Fetching,
            Stage::Fetching => Stage::BuildingResponse,
            Stage::BuildingResponse => Stage::Rewriting,
            Stage::Rewriting | Stage::Done => Stage::Done,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::SelectingVariant => "selecting_variant",
            Stage::Fetching => "fetching",
            Stage::BuildingResponse => "building_response",
            Stage::Rewriting => "rewriting",
            Stage::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request handler independent of any server: headers in, response out.
#[derive(Clone)]
pub struct Pipeline {
    selector: VariantSelector,
    fetcher: ContentFetcher,
    rewriter: ContentRewriter,
}

impl Pipeline {
    pub fn new(selector: VariantSelector, fetcher: ContentFetcher, rewriter: ContentRewriter) -> Self {
        Self {
            selector,
            fetcher,
            rewriter,
        }
    }

    /// Wire the components from runtime configuration.
    pub fn from_config(config: &EdgeConfig, table: Arc<ContentTable>) -> Self {
        let client = HttpClient::new(config.timeout_ms, &config.user_agent);
        Self::new(
            VariantSelector::new(client.clone(), config.variants_endpoint.clone()),
            ContentFetcher::new(client),
            ContentRewriter::new(table),
        )
    }

    pub fn selector(&self) -> &VariantSelector {
        &self.selector
    }

    /// Run the pipeline for one request. Only the `Cookie` header is read.
    pub async fn handle(&self, headers: &HeaderMap) -> EdgeResult<Response> {
        let request_id = Uuid::new_v4();
        let started = Instant::now();
        let mut stage = Stage::SelectingVariant;

        let result = self.run(headers, request_id, &mut stage).await;
        if let Err(e) = &result {
            debug!(%request_id, %stage, error = %e, "pipeline aborted");
        } else {
            debug!(
                %request_id,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "pipeline done"
            );
        }
        result
    }

    async fn run(
        &self,
        headers: &HeaderMap,
        request_id: Uuid,
        stage: &mut Stage,
    ) -> EdgeResult<Response> {
        debug!(%request_id, stage = %*stage, "pipeline stage");
        let selection = self.selector.select(headers).await?;
        let variant = selection.url;
        let rules = self.rewriter.rules_for_variant(&variant)?;

        advance(stage, request_id);
        let fetched = self.fetcher.get_variant_text(&variant).await?;

        advance(stage, request_id);
        let response = prepare_response(fetched)?;

        advance(stage, request_id);
        let response = rewrite_response(response, &rules).await?;

        advance(stage, request_id);
        info!(
            %request_id,
            variant = %variant,
            sticky = selection.sticky,
            "served variant"
        );
        Ok(response)
    }
}

fn advance(stage: &mut Stage, request_id: Uuid) {
    *stage = stage.next();
    debug!(%request_id, stage = %*stage, "pipeline stage");
}
