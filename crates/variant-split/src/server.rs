// Copyright 2026 Variant Split Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP front for the pipeline.
//!
//! Every method and path is routed to the same handler; only the
//! request's `Cookie` header affects the result.

use crate::pipeline::Pipeline;
use axum::extract::State;
use axum::http::{HeaderMap, Method, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Build the axum Router.
pub fn router(pipeline: Arc<Pipeline>) -> Router {
    Router::new()
        .fallback(handle_edge)
        .layer(TraceLayer::new_for_http())
        .with_state(pipeline)
}

/// Serve until ctrl-c.
pub async fn serve(addr: SocketAddr, pipeline: Arc<Pipeline>) -> anyhow::Result<()> {
    let app = router(pipeline);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("edge listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("received shutdown signal");
        })
        .await?;
    info!("server stopped");
    Ok(())
}

async fn handle_edge(
    State(pipeline): State<Arc<Pipeline>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    match pipeline.handle(&headers).await {
        Ok(response) => response,
        Err(e) => {
            if e.is_upstream() {
                warn!(%method, %uri, code = e.code(), "upstream failure: {e}");
            } else {
                error!(%method, %uri, code = e.code(), "request failed: {e}");
            }
            e.into_response()
        }
    }
}
