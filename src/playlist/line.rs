//! Playlist line tagging.

/// Comment / tag marker of extended M3U.
pub const DIRECTIVE_MARKER: char = '#';

/// One line of manifest text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistLine<'a> {
    /// Blank line or `#...` tag, copied verbatim.
    Directive(&'a str),
    /// Media URI (already trimmed), rewritten through the proxy.
    Reference(&'a str),
}

impl<'a> PlaylistLine<'a> {
    /// Tag a raw line. The marker is only recognized in the first column.
    pub fn parse(line: &'a str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() || line.starts_with(DIRECTIVE_MARKER) {
            PlaylistLine::Directive(line)
        } else {
            PlaylistLine::Reference(trimmed)
        }
    }
}
