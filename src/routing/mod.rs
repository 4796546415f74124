//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Captured path (+ query)
//!     → classify.rs (manifest / segment / generic by suffix)
//!     → target.rs (domain segment or join against base URL)
//!     → TargetDescriptor (URL + header profile)
//! ```
//!
//! # Design Decisions
//! - Base URL and profiles fixed at startup, immutable at runtime
//! - Deterministic: same path always resolves to the same target

pub mod classify;
pub mod target;

pub use classify::ContentClass;
pub use target::{resolve_target, TargetDescriptor};
