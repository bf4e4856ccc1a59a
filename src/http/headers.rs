//! Development header middleware
//!
//! Every response leaving the server passes through [`apply_dev_headers`], which adds
//! the CORS and cross-origin isolation headers browsers require before they let a page
//! use `SharedArrayBuffer` and threaded WebAssembly.

use hyper::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use hyper::Response;

/// Headers attached to every response, whatever its status
pub const DEV_HEADERS: [(&str, &str); 6] = [
    ("access-control-allow-origin", "*"),
    ("access-control-allow-methods", "GET, POST, OPTIONS"),
    ("access-control-allow-headers", "Content-Type"),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-embedder-policy", "require-corp"),
    ("cache-control", "no-cache, no-store, must-revalidate"),
];

/// Content type forced by the request path suffix
///
/// Matching is case sensitive and checked in order; `None` leaves the type
/// chosen by the file handler alone.
pub fn content_type_override(request_path: &str) -> Option<&'static str> {
    if request_path.ends_with(".wasm") {
        Some("application/wasm")
    } else if request_path.ends_with(".js") {
        Some("application/javascript")
    } else if request_path.ends_with(".html") {
        Some("text/html; charset=utf-8")
    } else {
        None
    }
}

/// Add the development headers to a finished response
///
/// `request_path` is the URI path as the client sent it, without the query.
pub fn apply_dev_headers<B>(response: &mut Response<B>, request_path: &str) {
    let headers = response.headers_mut();
    for (name, value) in DEV_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    if let Some(content_type) = content_type_override(request_path) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    }
}
