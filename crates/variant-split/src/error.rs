//! Error types and HTTP error codes for the edge pipeline.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

/// Machine-readable codes carried in error response bodies.
pub mod error_codes {
    pub const UPSTREAM_UNAVAILABLE: &str = "E_UPSTREAM_UNAVAILABLE";
    pub const MALFORMED_VARIANTS: &str = "E_MALFORMED_VARIANTS";
    pub const EMPTY_VARIANTS: &str = "E_EMPTY_VARIANTS";
    pub const INVALID_VARIANT_URL: &str = "E_INVALID_VARIANT_URL";
    pub const UNKNOWN_VARIANT: &str = "E_UNKNOWN_VARIANT";
    pub const REWRITE: &str = "E_REWRITE";
    pub const INTERNAL: &str = "E_INTERNAL";
}

/// All errors that can abort a request pipeline.
#[derive(thiserror::Error, Debug)]
pub enum EdgeError {
    /// Transport failure on either upstream, or a non-2xx variants listing.
    #[error("Upstream unavailable: {url}: {reason}")]
    UpstreamUnavailable { url: String, reason: String },

    #[error("Malformed variant list from {url}: {reason}")]
    MalformedVariantList { url: String, reason: String },

    #[error("Empty variant list from {url}")]
    EmptyVariantList { url: String },

    /// The variant URL cannot be carried in a `Set-Cookie` value.
    #[error("Invalid variant URL: {0:?}")]
    InvalidVariantUrl(String),

    /// No content table entry for the selected variant.
    #[error("Unknown variant: {0}")]
    UnknownVariant(String),

    #[error("Rewrite error: {0}")]
    Rewrite(String),

    #[error("Body error: {0}")]
    Body(String),
}

impl EdgeError {
    pub fn upstream(url: &str, reason: impl ToString) -> Self {
        EdgeError::UpstreamUnavailable {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// HTTP status returned to the client for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            EdgeError::UpstreamUnavailable { .. }
            | EdgeError::MalformedVariantList { .. }
            | EdgeError::EmptyVariantList { .. }
            | EdgeError::InvalidVariantUrl(_) => StatusCode::BAD_GATEWAY,
            EdgeError::UnknownVariant(_) | EdgeError::Rewrite(_) | EdgeError::Body(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        use error_codes::*;
        match self {
            EdgeError::UpstreamUnavailable { .. } => UPSTREAM_UNAVAILABLE,
            EdgeError::MalformedVariantList { .. } => MALFORMED_VARIANTS,
            EdgeError::EmptyVariantList { .. } => EMPTY_VARIANTS,
            EdgeError::InvalidVariantUrl(_) => INVALID_VARIANT_URL,
            EdgeError::UnknownVariant(_) => UNKNOWN_VARIANT,
            EdgeError::Rewrite(_) => REWRITE,
            EdgeError::Body(_) => INTERNAL,
        }
    }

    /// Whether the failure originated upstream rather than in this process.
    pub fn is_upstream(&self) -> bool {
        self.status() == StatusCode::BAD_GATEWAY
    }
}

impl IntoResponse for EdgeError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": { "code": self.code(), "message": self.to_string() }
        });
        (self.status(), Json(body)).into_response()
    }
}

pub type EdgeResult<T> = Result<T, EdgeError>;
