//! Outbound header profiles.
//!
//! The default origin only answers clients that look like its own player,
//! so requests to it carry a fixed identity; other hosts get a bare
//! User-Agent.

use axum::http::header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderName, InvalidHeaderValue, HOST, USER_AGENT};
use thiserror::Error;
use url::Url;

use crate::config::UpstreamConfig;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("invalid base URL: {0}")]
    BaseUrl(#[from] url::ParseError),

    #[error("invalid header name: {0}")]
    Name(#[from] InvalidHeaderName),

    #[error("invalid header value: {0}")]
    Value(#[from] InvalidHeaderValue),
}

/// Which outbound header set a target uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    /// Full player identity for the default origin.
    Origin,
    /// User-Agent only.
    Generic,
}

/// Read-only header profile table, built once at startup.
#[derive(Debug, Clone)]
pub struct HeaderProfiles {
    origin_host: Option<String>,
    origin: HeaderMap,
    generic: HeaderMap,
}

impl HeaderProfiles {
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, ProfileError> {
        let base = Url::parse(&config.base_url)?;

        let mut origin = HeaderMap::with_capacity(config.origin_headers.len());
        for entry in &config.origin_headers {
            origin.append(
                HeaderName::from_bytes(entry.name.as_bytes())?,
                HeaderValue::from_str(&entry.value)?,
            );
        }

        // The Host entry always names the configured origin.
        if origin.contains_key(HOST) {
            if let Some(authority) = origin_authority(&base) {
                origin.insert(HOST, HeaderValue::from_str(&authority)?);
            }
        }

        let mut generic = HeaderMap::with_capacity(1);
        generic.insert(USER_AGENT, HeaderValue::from_str(&config.user_agent)?);

        Ok(Self {
            origin_host: base.host_str().map(str::to_ascii_lowercase),
            origin,
            generic,
        })
    }

    /// Pick the profile for a resolved target.
    pub fn select(&self, target: &Url) -> ProfileKind {
        match (target.host_str(), self.origin_host.as_deref()) {
            (Some(host), Some(origin)) if host.eq_ignore_ascii_case(origin) => ProfileKind::Origin,
            _ => ProfileKind::Generic,
        }
    }

    pub fn headers(&self, kind: ProfileKind) -> &HeaderMap {
        match kind {
            ProfileKind::Origin => &self.origin,
            ProfileKind::Generic => &self.generic,
        }
    }
}

/// `host[:port]` as it belongs in a Host header; default ports are omitted.
fn origin_authority(base: &Url) -> Option<String> {
    let host = base.host_str()?;
    Some(match base.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}
