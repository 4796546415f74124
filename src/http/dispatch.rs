//! Request dispatch: resolve, fetch, then rewrite or stream.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::response::Response;
use url::Url;

use crate::config::{ProxyConfig, StreamingConfig};
use crate::error::ProxyError;
use crate::http::headers::filter_headers;
use crate::http::request::IncomingRequest;
use crate::http::response;
use crate::playlist::rewrite_manifest;
use crate::routing::{ContentClass, TargetDescriptor};
use crate::streaming::{rechunk, MeteredStream, StreamCounters};
use crate::upstream::{HeaderProfiles, ProfileError, UpstreamFetcher};

const MANIFEST_PREVIEW_CHARS: usize = 500;

/// Read-only state shared by every request.
#[derive(Debug)]
pub struct ProxyContext {
    pub base_url: Url,
    pub profiles: HeaderProfiles,
    pub fetcher: UpstreamFetcher,
    pub streaming: StreamingConfig,
    /// Used to build the client-facing base URL when no Host header is sent.
    /// A wildcard bind address is replaced by loopback on the same port.
    pub fallback_host: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),
}

impl ProxyContext {
    pub fn from_config(config: &ProxyConfig) -> Result<Self, ContextError> {
        Ok(Self {
            base_url: Url::parse(&config.upstream.base_url).map_err(ProfileError::from)?,
            profiles: HeaderProfiles::from_config(&config.upstream)?,
            fetcher: UpstreamFetcher::new(Duration::from_secs(config.timeouts.upstream_secs))?,
            streaming: config.streaming.clone(),
            fallback_host: fallback_host(&config.listener.bind_address),
        })
    }
}

/// Proxy one request to its upstream and build the client response.
#[tracing::instrument(
    name = "dispatch",
    skip_all,
    err(Display),
    fields(path = %incoming.path, upstream = tracing::field::Empty)
)]
pub async fn dispatch(ctx: &ProxyContext, incoming: &IncomingRequest) -> Result<Response, ProxyError> {
    let class = ContentClass::from_path(&incoming.path);
    let target = TargetDescriptor::resolve(
        &incoming.path,
        incoming.query.as_deref(),
        &ctx.base_url,
        &ctx.profiles,
    )?;
    tracing::Span::current().record("upstream", tracing::field::display(&target.url));

    tracing::info!(class = class.as_str(), "Client requested /{}", incoming.path);
    tracing::info!(profile = ?target.profile, "Forwarding to {}", target.url);

    let started = Instant::now();
    let upstream = ctx
        .fetcher
        .fetch(&target.url, ctx.profiles.headers(target.profile))
        .await?;
    let (head, body) = upstream.into_parts();

    tracing::info!(
        status = head.status.as_u16(),
        content_type = %head.content_type,
        "Upstream responded"
    );

    let headers = filter_headers(&head.headers, class);

    let response = match class {
        ContentClass::Manifest => {
            let playlist = body.text().await?;
            tracing::debug!(
                preview = %preview(&playlist, MANIFEST_PREVIEW_CHARS),
                "Manifest received"
            );
            let rewritten = rewrite_manifest(&playlist, &incoming.host_url)?;
            response::manifest(head.status, headers, rewritten)
        }
        ContentClass::Segment => {
            tracing::info!("Video segment detected");
            let chunks = rechunk(body.into_stream(), ctx.streaming.segment_chunk_size);
            let counters = StreamCounters::new(incoming.path.clone(), started);
            let stream = MeteredStream::new(chunks, counters);
            response::streamed(head.status, headers, Body::from_stream(stream))
        }
        ContentClass::Generic => {
            let chunks = rechunk(body.into_stream(), ctx.streaming.passthrough_chunk_size);
            response::streamed(head.status, headers, Body::from_stream(chunks))
        }
    };

    Ok(response)
}

fn fallback_host(bind_address: &str) -> String {
    match bind_address.parse::<SocketAddr>() {
        Ok(addr) if addr.ip().is_unspecified() => {
            let loopback = match addr.ip() {
                IpAddr::V4(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
                IpAddr::V6(_) => IpAddr::V6(Ipv6Addr::LOCALHOST),
            };
            SocketAddr::new(loopback, addr.port()).to_string()
        }
        _ => bind_address.to_string(),
    }
}

fn preview(text: &str, max_chars: usize) -> &str {
    text.char_indices()
        .nth(max_chars)
        .map_or(text, |(end, _)| &text[..end])
}
