//! The fixed CORS header set.
//!
//! Every response leaving the proxy carries these three headers: preflight
//! answers, relayed upstream responses (success or error status alike), and
//! locally generated failures. They are attached by a `map_response` layer
//! at the outermost position of the router so no branch can miss them.

use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::Response;

const ALLOW_ORIGIN: HeaderValue = HeaderValue::from_static("*");
const ALLOW_METHODS: HeaderValue = HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS");
const ALLOW_HEADERS: HeaderValue = HeaderValue::from_static("Content-Type");

/// Insert the permissive CORS header set into a header map.
pub fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ORIGIN);
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS);
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS);
}

/// Response-mapping middleware attaching CORS headers unconditionally.
pub async fn attach_cors(mut response: Response) -> Response {
    apply_cors_headers(response.headers_mut());
    response
}
