//! Content classification by path suffix.
//!
//! # Design Decisions
//! - Only the captured path is inspected, never the upstream content-type
//! - Suffix matching is case-sensitive
//! - No regex to guarantee O(n) matching

/// How a proxied response body is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentClass {
    /// `.m3u8` playlist, fully read and rewritten.
    Manifest,
    /// `.ts` media segment, streamed in fixed-size chunks.
    Segment,
    /// Anything else, streamed through unchanged.
    Generic,
}

impl ContentClass {
    pub fn from_path(path: &str) -> Self {
        if path.ends_with(".m3u8") {
            ContentClass::Manifest
        } else if path.ends_with(".ts") {
            ContentClass::Segment
        } else {
            ContentClass::Generic
        }
    }

    /// Response headers that must not be relayed for this class.
    ///
    /// Names are lowercase, matching `HeaderName::as_str`.
    pub fn excluded_headers(self) -> &'static [&'static str] {
        match self {
            ContentClass::Manifest => &["content-encoding", "transfer-encoding", "connection"],
            ContentClass::Segment => &[
                "connection",
                "keep-alive",
                "proxy-authenticate",
                "proxy-authorization",
                "te",
                "trailers",
                "transfer-encoding",
                "upgrade",
            ],
            ContentClass::Generic => &["connection", "transfer-encoding"],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContentClass::Manifest => "manifest",
            ContentClass::Segment => "segment",
            ContentClass::Generic => "generic",
        }
    }
}
