//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace span)
//!     → request.rs (captured path, query, client-facing base URL)
//!     → dispatch.rs (resolve target, fetch, branch on content class)
//!     → headers.rs (strip hop-by-hop headers)
//!     → response.rs (status passthrough, body)
//!     → Send to client
//! ```

pub mod dispatch;
pub mod headers;
pub mod request;
pub mod response;
pub mod server;
pub mod status;

pub use dispatch::{dispatch, ProxyContext};
pub use request::{IncomingRequest, MakeRequestUuidV4};
pub use server::HttpServer;
