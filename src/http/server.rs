//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID)
//! - Bind server to listener
//! - Dispatch proxied paths and map failures to responses
//! - Observability (metrics, request IDs)

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::{HeaderMap, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::http::dispatch::{dispatch, ContextError, ProxyContext};
use crate::http::request::{IncomingRequest, MakeRequestUuidV4};
use crate::http::status::{not_found, status_page};
use crate::lifecycle::wait_for_shutdown;
use crate::observability::metrics;
use crate::routing::ContentClass;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<ProxyContext>,
}

/// HTTP server for the streaming proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, ContextError> {
        let state = AppState {
            ctx: Arc::new(ProxyContext::from_config(&config)?),
        };

        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", get(status_page))
            .route("/{*path}", get(proxy_handler))
            .fallback(not_found)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// Run the server until `shutdown` fires or an OS signal arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            base_url = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main proxy handler.
async fn proxy_handler(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let start_time = Instant::now();
    let incoming = IncomingRequest::from_parts(&uri, &headers, &state.ctx.fallback_host);
    if incoming.path.is_empty() {
        return not_found(State(state), uri, headers).await.into_response();
    }

    let class = ContentClass::from_path(&incoming.path);
    match dispatch(&state.ctx, &incoming).await {
        Ok(response) => {
            metrics::record_request(class.as_str(), response.status().as_u16(), start_time);
            response
        }
        Err(e) => {
            metrics::record_error(e.kind());
            metrics::record_request(class.as_str(), e.status().as_u16(), start_time);
            e.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use crate::error::ProxyError;

    fn router() -> Router {
        let state = AppState {
            ctx: Arc::new(ProxyContext::from_config(&ProxyConfig::default()).unwrap()),
        };
        HttpServer::build_router(state)
    }

    #[tokio::test]
    async fn test_status_page() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::HOST, "proxyhost")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));

        let body = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["host_url"], "http://proxyhost/");
        assert_eq!(json["base_url"], "http://u.m3uts.xyz/");
        assert!(json.get("error").is_none());
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }

    #[tokio::test]
    async fn test_non_get_is_rejected() {
        let response = router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/live/index.m3u8")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_not_found_document() {
        let response = not_found(
            State(AppState {
                ctx: Arc::new(ProxyContext::from_config(&ProxyConfig::default()).unwrap()),
            }),
            "/missing".parse().unwrap(),
            HeaderMap::new(),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json["error"],
            "Ruta no encontrada. Use el proxy añadiendo la URL después del dominio."
        );
        assert_eq!(json["error"], ProxyError::RouteNotFound.body());
        assert_eq!(json["base_url"], "http://u.m3uts.xyz/");
    }
}
