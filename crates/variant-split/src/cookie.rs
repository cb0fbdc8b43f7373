//! `Cookie` header parsing and `Set-Cookie` formatting.

use axum::http::{header, HeaderMap};
use regex::Regex;

/// Name of the cookie that pins a visitor to a variant.
pub const VARIANT_COOKIE: &str = "variant";

/// Read a named cookie from the request headers.
///
/// Multiple `Cookie` headers (HTTP/2 may split them) are joined with `"; "`
/// before matching. Returns `None` when no header is present or the name
/// does not occur.
pub fn get_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let values: Vec<&str> = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();
    if values.is_empty() {
        return None;
    }
    find_cookie(&values.join("; "), name)
}

/// Find `name=value` in a raw cookie string.
///
/// The pair must start the string or follow a `;` (optionally followed by
/// whitespace); the value runs to the next `;` or the end of the string.
/// The name is matched literally.
pub fn find_cookie(raw: &str, name: &str) -> Option<String> {
    let pattern = format!(r"(?:^|;\s*){}=([^;]*)", regex::escape(name));
    let re = Regex::new(&pattern).ok()?;
    re.captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Whether `value` consists only of RFC 6265 cookie-octets.
pub fn is_cookie_value_safe(value: &str) -> bool {
    !value.is_empty()
        && value.bytes().all(|b| {
            matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E)
        })
}

/// Format a session-scoped `Set-Cookie` value: no expiry, path or flags.
pub fn format_set_cookie(name: &str, value: &str) -> String {
    format!("{name}={value}")
}
