//! Emphasis and strikethrough closing.
//!
//! Markers nest, so unclosed ones are tracked on a stack and closed in
//! reverse order of opening.

/// One emphasis or strikethrough delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    StrongEmphasis,
    StrongStar,
    StrongUnderscore,
    EmphasisStar,
    EmphasisUnderscore,
    DoubleTilde,
    Tilde,
}

impl Marker {
    /// Longest first, so `***` is never read as `*` followed by `**`.
    pub const ALL: [Marker; 7] = [
        Marker::StrongEmphasis,
        Marker::StrongStar,
        Marker::StrongUnderscore,
        Marker::EmphasisStar,
        Marker::EmphasisUnderscore,
        Marker::DoubleTilde,
        Marker::Tilde,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Marker::StrongEmphasis => "***",
            Marker::StrongStar => "**",
            Marker::StrongUnderscore => "__",
            Marker::EmphasisStar => "*",
            Marker::EmphasisUnderscore => "_",
            Marker::DoubleTilde => "~~",
            Marker::Tilde => "~",
        }
    }

    fn at(rest: &[u8]) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|marker| rest.starts_with(marker.as_str().as_bytes()))
    }
}

/// Markers still open after scanning `text`, outermost first.
pub fn open_markers(text: &str) -> Vec<Marker> {
    let bytes = text.as_bytes();
    let mut stack: Vec<Marker> = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        match Marker::at(&bytes[pos..]) {
            Some(marker) => {
                if stack.last() == Some(&marker) {
                    stack.pop();
                } else {
                    stack.push(marker);
                }
                pos += marker.as_str().len();
            }
            None => pos += 1,
        }
    }

    stack
}

/// Append closers for every open marker, innermost first.
pub fn close_emphasis(text: &str) -> String {
    let mut repaired = text.to_string();
    for marker in open_markers(text).into_iter().rev() {
        repaired.push_str(marker.as_str());
    }
    repaired
}
