//! Request-level error taxonomy and its mapping to HTTP responses.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::playlist::ManifestError;

/// Errors that terminate a single proxied request.
///
/// None of these trigger a retry; each is mapped to exactly one status code.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The origin could not be reached or did not answer in time.
    #[error("{0}")]
    UpstreamUnreachable(String),

    /// The request path did not form a usable upstream URL.
    #[error("invalid target URL '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },

    /// Any other fault while building the response.
    #[error("{0}")]
    InternalFault(String),

    /// No route matches the request.
    #[error("route not found")]
    RouteNotFound,
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::UpstreamUnreachable(_) | ProxyError::InvalidTarget { .. } => {
                StatusCode::BAD_GATEWAY
            }
            ProxyError::InternalFault(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::RouteNotFound => StatusCode::NOT_FOUND,
        }
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::UpstreamUnreachable(_) => "upstream_unreachable",
            ProxyError::InvalidTarget { .. } => "invalid_target",
            ProxyError::InternalFault(_) => "internal",
            ProxyError::RouteNotFound => "not_found",
        }
    }

    /// Plain-text body sent to the client.
    pub fn body(&self) -> String {
        match self {
            ProxyError::UpstreamUnreachable(_) | ProxyError::InvalidTarget { .. } => {
                format!("Error de proxy: {}", self)
            }
            ProxyError::InternalFault(_) => format!("Error interno del servidor: {}", self),
            ProxyError::RouteNotFound => NOT_FOUND_MESSAGE.to_string(),
        }
    }
}

const NOT_FOUND_MESSAGE: &str =
    "Ruta no encontrada. Use el proxy añadiendo la URL después del dominio.";

impl From<reqwest::Error> for ProxyError {
    fn from(e: reqwest::Error) -> Self {
        ProxyError::UpstreamUnreachable(e.to_string())
    }
}

impl From<ManifestError> for ProxyError {
    fn from(e: ManifestError) -> Self {
        ProxyError::InternalFault(e.to_string())
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (
            self.status(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.body(),
        )
            .into_response()
    }
}
