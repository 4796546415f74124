//! Outbound GET against the origin.
//!
//! # Responsibilities
//! - Own the shared HTTP client (connection pool)
//! - Bound connect + response-header time
//! - Hand the body back unread so callers choose text or streaming
//!
//! # Design Decisions
//! - The deadline covers `send()` only; body transfer is never timed out
//! - Transport faults become `UpstreamUnreachable`, never retried

use std::time::Duration;

use axum::body::Bytes;
use axum::http::{header, HeaderMap, StatusCode};
use futures_util::Stream;
use url::Url;

use crate::error::ProxyError;

/// Shared upstream client.
#[derive(Debug, Clone)]
pub struct UpstreamFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl UpstreamFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .build()?;
        Ok(Self { client, timeout })
    }

    /// Issue the GET and wait for the response head.
    pub async fn fetch(&self, target: &Url, headers: &HeaderMap) -> Result<UpstreamResponse, ProxyError> {
        let request = self.client.get(target.clone()).headers(headers.clone());

        let response = tokio::time::timeout(self.timeout, request.send())
            .await
            .map_err(|_| {
                ProxyError::UpstreamUnreachable(format!(
                    "no response from {} within {}s",
                    target,
                    self.timeout.as_secs()
                ))
            })??;

        Ok(UpstreamResponse::new(response))
    }
}

/// Status line and headers of an upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamHead {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub content_type: String,
}

/// Unread upstream body.
#[derive(Debug)]
pub struct UpstreamBody {
    inner: reqwest::Response,
}

impl UpstreamBody {
    /// Read the whole body as text.
    pub async fn text(self) -> Result<String, ProxyError> {
        Ok(self.inner.text().await?)
    }

    /// Lazy byte stream; nothing is read until it is polled.
    pub fn into_stream(self) -> impl Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static {
        self.inner.bytes_stream()
    }
}

/// Upstream response owned by a single request.
#[derive(Debug)]
pub struct UpstreamResponse {
    head: UpstreamHead,
    body: UpstreamBody,
}

impl UpstreamResponse {
    fn new(inner: reqwest::Response) -> Self {
        let headers = inner.headers().clone();
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        Self {
            head: UpstreamHead {
                status: inner.status(),
                headers,
                content_type,
            },
            body: UpstreamBody { inner },
        }
    }

    pub fn into_parts(self) -> (UpstreamHead, UpstreamBody) {
        (self.head, self.body)
    }
}
