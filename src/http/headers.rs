//! Response header filtering.
//!
//! Strips hop-by-hop and transport headers from upstream responses before
//! they are relayed. The set depends on how the body is handled.

use axum::http::HeaderMap;

use crate::routing::ContentClass;

/// Copy `headers` without the names excluded for `class`.
///
/// Matching is case-insensitive (`HeaderName` is always lowercase);
/// relative order and repeated values are preserved.
pub fn filter_headers(headers: &HeaderMap, class: ContentClass) -> HeaderMap {
    let excluded = class.excluded_headers();
    let mut filtered = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if !excluded.contains(&name.as_str()) {
            filtered.append(name.clone(), value.clone());
        }
    }
    filtered
}
