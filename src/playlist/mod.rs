//! Extended M3U playlist handling.
//!
//! # Data Flow
//! ```text
//! manifest text
//!     → line.rs (directive / reference)
//!     → uri.rs (split reference into netloc, path, query)
//!     → rewrite.rs (prefix with the proxy's own base URL)
//! ```
//!
//! # Design Decisions
//! - Pure line-to-line transform, no state across lines
//! - References are not resolved against the manifest URL

pub mod line;
pub mod rewrite;
pub mod uri;

pub use line::PlaylistLine;
pub use rewrite::{rewrite_manifest, ManifestError, MANIFEST_CONTENT_TYPE};
