//! Streaming HLS reverse proxy library.
//!
//! Fronts a media origin, relays segments in bounded chunks, and rewrites
//! `.m3u8` manifests so every media URI is fetched back through the proxy.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod playlist;
pub mod routing;
pub mod streaming;
pub mod upstream;

pub use config::ProxyConfig;
pub use error::ProxyError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
