//! Upstream target resolution.
//!
//! # Responsibilities
//! - Turn the captured request path into a fully qualified upstream URL
//! - Attach the header profile chosen for the resolved host
//!
//! # Design Decisions
//! - A first path segment containing a dot is read as a domain name
//! - Everything else is resolved relative to the configured base URL
//! - Pure: no I/O, no allocation beyond the resulting URL

use url::Url;

use crate::error::ProxyError;
use crate::upstream::profile::{HeaderProfiles, ProfileKind};

/// Resolved upstream resource for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDescriptor {
    pub url: Url,
    pub profile: ProfileKind,
}

impl TargetDescriptor {
    /// Resolve `path` and pick the matching header profile.
    pub fn resolve(
        path: &str,
        query: Option<&str>,
        base: &Url,
        profiles: &HeaderProfiles,
    ) -> Result<Self, ProxyError> {
        let url = resolve_target(path, query, base)?;
        let profile = profiles.select(&url);
        Ok(Self { url, profile })
    }
}

/// Derive the upstream URL for a captured path (no leading slash).
///
/// `cdn.example.com/live/a.ts` becomes `http://cdn.example.com/live/a.ts`;
/// `live/a.ts` is joined against `base`. A non-empty `query` is carried over.
pub fn resolve_target(path: &str, query: Option<&str>, base: &Url) -> Result<Url, ProxyError> {
    let mut url = match path.split_once('/') {
        Some((domain, rest)) if domain.contains('.') => {
            let target = format!("http://{}/{}", domain, rest);
            Url::parse(&target).map_err(|e| ProxyError::InvalidTarget {
                target,
                reason: e.to_string(),
            })?
        }
        _ => base.join(path).map_err(|e| ProxyError::InvalidTarget {
            target: format!("{}{}", base, path),
            reason: e.to_string(),
        })?,
    };

    if let Some(query) = query.filter(|q| !q.is_empty()) {
        url.set_query(Some(query));
    }

    Ok(url)
}
