//! Status document for `/` and unmatched routes.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::Json;
use serde::Serialize;

use crate::error::ProxyError;
use crate::http::request::host_url;
use crate::http::server::AppState;
use crate::observability::metrics;

#[derive(Debug, Serialize)]
pub struct StatusPage {
    pub service: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    /// Base URL clients should prefix to upstream URLs.
    pub host_url: String,
    /// Origin that non-domain paths are resolved against.
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusPage {
    fn new(state: &AppState, uri: &Uri, headers: &HeaderMap) -> Self {
        Self {
            service: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            status: "operational",
            host_url: host_url(uri, headers, &state.ctx.fallback_host),
            base_url: state.ctx.base_url.to_string(),
            error: None,
        }
    }
}

pub async fn status_page(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
) -> Json<StatusPage> {
    Json(StatusPage::new(&state, &uri, &headers))
}

pub async fn not_found(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
) -> (StatusCode, Json<StatusPage>) {
    let err = ProxyError::RouteNotFound;
    tracing::warn!(path = %uri.path(), "No route matched");
    metrics::record_error(err.kind());

    let page = StatusPage {
        error: Some(err.body()),
        ..StatusPage::new(&state, &uri, &headers)
    };
    (err.status(), Json(page))
}
