use once_cell::sync::Lazy;
use regex::Regex;

static LINK_TEXT: Lazy<Regex> = Lazy::new(|| compile(r"\[[^\]]*$"));
static LINK_URL: Lazy<Regex> = Lazy::new(|| compile(r"\]\([^)]*$"));
static IMAGE_ALT: Lazy<Regex> = Lazy::new(|| compile(r"!\[[^\]]*$"));
static IMAGE_URL: Lazy<Regex> = Lazy::new(|| compile(r"!\[[^\]]*\([^)]*$"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|err| panic!("invalid repair pattern {pattern}: {err}"))
}

/// Close an unterminated link: first the text bracket, then the URL paren.
pub fn close_links(text: &str) -> String {
    let mut repaired = text.to_string();
    if LINK_TEXT.is_match(&repaired) && !closed_after_last(&repaired, "[") {
        repaired.push(']');
    }
    if LINK_URL.is_match(&repaired) && !ends_with_paren(&repaired) {
        repaired.push(')');
    }
    repaired
}

/// Close an unterminated image, anchored on `![` instead of a bare bracket.
///
/// Alt text holding a nested bracket pair (`![alt [x] more`) is not detected:
/// the inner `]` satisfies the "closed after the opener" test.
pub fn close_images(text: &str) -> String {
    let mut repaired = text.to_string();
    if IMAGE_ALT.is_match(&repaired) && !closed_after_last(&repaired, "![") {
        repaired.push(']');
    }
    if IMAGE_URL.is_match(&repaired) && !ends_with_paren(&repaired) {
        repaired.push(')');
    }
    repaired
}

fn closed_after_last(text: &str, opener: &str) -> bool {
    text.rfind(opener)
        .map(|pos| text[pos..].contains(']'))
        .unwrap_or(true)
}

fn ends_with_paren(text: &str) -> bool {
    text.trim().ends_with(')')
}
