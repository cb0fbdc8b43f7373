//! Builds the outgoing response around a fetched variant.

use crate::cookie::{self, VARIANT_COOKIE};
use crate::error::{EdgeError, EdgeResult};
use crate::fetcher::FetchedVariant;
use crate::http_client::HTML_CONTENT_TYPE;
use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;

/// Wrap the variant HTML in a 200 response and pin the visitor to it.
///
/// The cookie is session-scoped: no expiry, path or flags. A URL that is
/// not a valid cookie value is rejected rather than encoded.
pub fn prepare_response(fetched: FetchedVariant) -> EdgeResult<Response> {
    if !cookie::is_cookie_value_safe(&fetched.url) {
        return Err(EdgeError::InvalidVariantUrl(fetched.url));
    }
    let set_cookie = HeaderValue::from_str(&cookie::format_set_cookie(VARIANT_COOKIE, &fetched.url))
        .map_err(|_| EdgeError::InvalidVariantUrl(fetched.url.clone()))?;

    let mut response = Response::new(Body::from(fetched.text));
    *response.status_mut() = StatusCode::OK;
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(HTML_CONTENT_TYPE));
    headers.insert(header::SET_COOKIE, set_cookie);
    Ok(response)
}
