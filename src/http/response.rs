//! Client-facing response assembly.
//!
//! Upstream status is passed through unchanged; the caller supplies
//! already-filtered headers.

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::Response;

use crate::playlist::MANIFEST_CONTENT_TYPE;

/// Rewritten manifest: body replaced, so type and length are reset.
pub fn manifest(status: StatusCode, mut headers: HeaderMap, body: String) -> Response {
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(MANIFEST_CONTENT_TYPE),
    );
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(body.len()));
    relay(status, headers, Body::from(body))
}

/// Streamed body with the upstream content-type left as is.
pub fn streamed(status: StatusCode, headers: HeaderMap, body: Body) -> Response {
    relay(status, headers, body)
}

fn relay(status: StatusCode, headers: HeaderMap, body: Body) -> Response {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}
