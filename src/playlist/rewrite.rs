//! Manifest rewriting.

use thiserror::Error;

use crate::playlist::line::PlaylistLine;
use crate::playlist::uri::{split_uri, UriError};

/// Content type of every rewritten manifest.
pub const MANIFEST_CONTENT_TYPE: &str = "application/vnd.apple.mpegurl";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    #[error("manifest line {line}: {source}")]
    Uri {
        line: usize,
        #[source]
        source: UriError,
    },
}

/// Rewrite every media reference so it is fetched through `proxy_base`.
///
/// A reference `scheme://netloc/path?query` becomes
/// `{proxy_base}{netloc}{path}?{query}`; directives are copied as is.
/// Every output line ends in `\n` and the line count is preserved.
/// References are assumed absolute: a relative one has no netloc and
/// produces `{proxy_base}{path}`.
pub fn rewrite_manifest(manifest: &str, proxy_base: &str) -> Result<String, ManifestError> {
    let mut out = String::with_capacity(manifest.len() + manifest.len() / 2);

    for (index, raw) in manifest.lines().enumerate() {
        match PlaylistLine::parse(raw) {
            PlaylistLine::Directive(line) => out.push_str(line),
            PlaylistLine::Reference(uri) => {
                let parts = split_uri(uri).map_err(|source| ManifestError::Uri {
                    line: index + 1,
                    source,
                })?;
                out.push_str(proxy_base);
                out.push_str(parts.netloc);
                out.push_str(parts.path);
                if !parts.query.is_empty() {
                    out.push('?');
                    out.push_str(parts.query);
                }
            }
        }
        out.push('\n');
    }

    Ok(out)
}
