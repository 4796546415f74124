//! Upstream subsystem.
//!
//! # Data Flow
//! ```text
//! TargetDescriptor
//!     → profile.rs (header set for the target host)
//!     → fetcher.rs (GET, bounded wait for response head)
//!     → UpstreamResponse (head + unread body)
//! ```

pub mod fetcher;
pub mod profile;

pub use fetcher::{UpstreamBody, UpstreamFetcher, UpstreamHead, UpstreamResponse};
pub use profile::{HeaderProfiles, ProfileError, ProfileKind};
