//! Generic URI splitting.
//!
//! Splits a reference into `scheme://netloc/path;params?query#fragment`
//! without resolving, normalizing or validating it beyond bracketed
//! hosts. A relative reference simply yields an empty `netloc`.

use std::net::Ipv6Addr;

use thiserror::Error;

/// Schemes whose last path segment may carry `;params`.
const USES_PARAMS: &[&str] = &[
    "", "ftp", "hdl", "prospero", "http", "imap", "https", "shttp", "rtsp", "rtsps", "rtspu",
    "sip", "sips", "mms", "sftp", "tel",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UriError {
    #[error("invalid IPv6 network location '{0}'")]
    InvalidIpv6(String),
}

/// Borrowed components of a split URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UriParts<'a> {
    pub scheme: &'a str,
    pub netloc: &'a str,
    pub path: &'a str,
    pub params: &'a str,
    pub query: &'a str,
    pub fragment: &'a str,
}

fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Split `uri` into its components.
pub fn split_uri(uri: &str) -> Result<UriParts<'_>, UriError> {
    let mut parts = UriParts::default();
    let mut rest = uri;

    if let Some((scheme, tail)) = rest.split_once(':') {
        if is_scheme(scheme) {
            parts.scheme = scheme;
            rest = tail;
        }
    }

    if let Some(tail) = rest.strip_prefix("//") {
        let end = tail.find(['/', '?', '#']).unwrap_or(tail.len());
        parts.netloc = &tail[..end];
        rest = &tail[end..];
        check_netloc(parts.netloc)?;
    }

    if let Some((before, fragment)) = rest.split_once('#') {
        parts.fragment = fragment;
        rest = before;
    }
    if let Some((before, query)) = rest.split_once('?') {
        parts.query = query;
        rest = before;
    }

    let (path, params) = if USES_PARAMS
        .iter()
        .any(|s| s.eq_ignore_ascii_case(parts.scheme))
    {
        split_params(rest)
    } else {
        (rest, "")
    };
    parts.path = path;
    parts.params = params;

    Ok(parts)
}

/// `;params` only count when they sit in the last path segment.
fn split_params(path: &str) -> (&str, &str) {
    let last_segment = path.rfind('/').unwrap_or(0);
    match path[last_segment..].find(';') {
        Some(i) => (&path[..last_segment + i], &path[last_segment + i + 1..]),
        None => (path, ""),
    }
}

fn check_netloc(netloc: &str) -> Result<(), UriError> {
    let invalid = || UriError::InvalidIpv6(netloc.to_string());

    if netloc.contains('[') != netloc.contains(']') {
        return Err(invalid());
    }

    let host_port = netloc.rsplit_once('@').map_or(netloc, |(_, hp)| hp);
    let Some((before, bracketed)) = host_port.split_once('[') else {
        return Ok(());
    };
    if !before.is_empty() {
        return Err(invalid());
    }
    let (host, port) = bracketed.split_once(']').unwrap_or((bracketed, ""));
    if !port.is_empty() && !port.starts_with(':') {
        return Err(invalid());
    }
    if is_ip_future(host) || host.parse::<Ipv6Addr>().is_ok() {
        Ok(())
    } else {
        Err(invalid())
    }
}

/// `vX.something` literal from RFC 3986 section 3.2.2.
fn is_ip_future(host: &str) -> bool {
    let Some(rest) = host.strip_prefix(['v', 'V']) else {
        return false;
    };
    let Some((version, addr)) = rest.split_once('.') else {
        return false;
    };
    !version.is_empty()
        && version.chars().all(|c| c.is_ascii_hexdigit())
        && !addr.is_empty()
        && addr
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-._~!$&'()*+,;=:".contains(c))
}
