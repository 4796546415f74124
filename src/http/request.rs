//! Request capture and identification.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) as early as possible
//! - Extract the captured path, query, and the client-facing base URL
//!
//! # Design Decisions
//! - The raw (still percent-encoded) path is used so the upstream URL keeps
//!   the client's encoding
//! - The client-facing base URL comes from the Host header, the same value
//!   the client used to reach the proxy

use axum::http::{header, HeaderMap, HeaderValue, Request, Uri};
use tower_http::request_id::{MakeRequestId, RequestId};

/// Generates `x-request-id` values for requests that arrive without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// What the proxy needs from an incoming request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingRequest {
    /// Path without the leading slash.
    pub path: String,
    /// Raw query string, if any.
    pub query: Option<String>,
    /// `scheme://host/` the client used to reach the proxy.
    pub host_url: String,
}

impl IncomingRequest {
    pub fn from_parts(uri: &Uri, headers: &HeaderMap, fallback_host: &str) -> Self {
        Self {
            path: uri.path().strip_prefix('/').unwrap_or(uri.path()).to_string(),
            query: uri.query().map(str::to_string),
            host_url: host_url(uri, headers, fallback_host),
        }
    }
}

/// Base URL of the proxy as seen by the client, with a trailing slash.
pub fn host_url(uri: &Uri, headers: &HeaderMap, fallback_host: &str) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .filter(|h| !h.is_empty())
        .or_else(|| uri.authority().map(|a| a.as_str()))
        .unwrap_or(fallback_host);
    let scheme = uri.scheme_str().unwrap_or("http");
    format!("{}://{}/", scheme, host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts() {
        let uri: Uri = "/cdn.example.com/seg1.ts?tok=1".parse().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("proxyhost:5000"));

        let req = IncomingRequest::from_parts(&uri, &headers, "0.0.0.0:5000");
        assert_eq!(req.path, "cdn.example.com/seg1.ts");
        assert_eq!(req.query.as_deref(), Some("tok=1"));
        assert_eq!(req.host_url, "http://proxyhost:5000/");
    }

    #[test]
    fn test_path_keeps_encoding() {
        let uri: Uri = "/live/a%20b.m3u8".parse().unwrap();
        let req = IncomingRequest::from_parts(&uri, &HeaderMap::new(), "127.0.0.1:5000");
        assert_eq!(req.path, "live/a%20b.m3u8");
        assert_eq!(req.query, None);
    }

    #[test]
    fn test_host_fallbacks() {
        let uri: Uri = "http://authority.test/x".parse().unwrap();
        assert_eq!(host_url(&uri, &HeaderMap::new(), "fb"), "http://authority.test/");

        let uri: Uri = "/x".parse().unwrap();
        assert_eq!(host_url(&uri, &HeaderMap::new(), "127.0.0.1:5000"), "http://127.0.0.1:5000/");
    }

    #[test]
    fn test_request_ids_are_unique() {
        let req = Request::new(());
        let mut maker = MakeRequestUuidV4;
        let a = maker.make_request_id(&req).unwrap();
        let b = maker.make_request_id(&req).unwrap();
        assert_ne!(a.header_value(), b.header_value());
    }
}
