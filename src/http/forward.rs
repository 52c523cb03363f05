//! Outbound request construction.
//!
//! # Responsibilities
//! - Join the fixed upstream base with the inbound path+query, verbatim
//!   (no normalization, no decoding/re-encoding)
//! - Decide whether the inbound body is read (POST/PUT with a positive
//!   `Content-Length` only)
//! - Filter inbound headers down to `Content-Type`
//!
//! # Design Decisions
//! - Every inbound header except `Content-Type` is dropped, including
//!   `Authorization` and `Cookie`. This mirrors the original proxy's
//!   observed behavior and is deliberate, not an oversight to fix.
//! - Bodies are fully buffered; streaming very large bodies is a non-goal.

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, Method, Request, Uri};
use thiserror::Error;

/// Failure to produce or transfer an outbound request.
///
/// Upstream HTTP error statuses are NOT errors here; they are relayed
/// responses. This type covers the transport class only, which the server
/// maps to a deliberate 502 instead of dropping the connection.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("invalid upstream URI: {0}")]
    InvalidUri(#[from] axum::http::uri::InvalidUri),

    #[error("failed to build upstream request: {0}")]
    Request(#[from] axum::http::Error),

    #[error("failed to read body: {0}")]
    BodyRead(#[source] axum::Error),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),
}

/// Join the upstream base with the inbound path+query verbatim.
pub fn upstream_uri(base: &str, path_and_query: &str) -> Result<Uri, ForwardError> {
    let joined = format!("{base}{path_and_query}");
    Ok(joined.parse::<Uri>()?)
}

/// Whether the inbound body should be read and forwarded.
///
/// Only POST and PUT carry a body, and only when `Content-Length` is
/// present and greater than zero. GET and DELETE never read a body, no
/// matter what headers the caller sent.
pub fn should_read_body(method: &Method, headers: &HeaderMap) -> bool {
    if method != Method::POST && method != Method::PUT {
        return false;
    }
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .is_some_and(|len| len > 0)
}

/// Build the outbound request: same method, joined URI, `Content-Type`
/// carried over if present, body bytes attached when read.
pub fn build_upstream_request(
    base: &str,
    method: Method,
    path_and_query: &str,
    inbound_headers: &HeaderMap,
    body: Option<Bytes>,
) -> Result<Request<Body>, ForwardError> {
    let uri = upstream_uri(base, path_and_query)?;

    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = inbound_headers.get(header::CONTENT_TYPE) {
        builder = builder.header(header::CONTENT_TYPE, content_type.clone());
    }

    let body = match body {
        Some(bytes) => Body::from(bytes),
        None => Body::empty(),
    };
    Ok(builder.body(body)?)
}
