const FENCE: &str = "```";

/// Close an unterminated fenced code block.
///
/// This is a parity count over the whole buffer, so a fence marker inside an
/// inline span still counts.
pub fn close_fences(text: &str) -> String {
    let mut repaired = text.to_string();
    if text.matches(FENCE).count() % 2 != 0 {
        repaired.push('\n');
        repaired.push_str(FENCE);
    }
    repaired
}

/// Close an unterminated inline code span. Runs after [`close_fences`], so
/// fence backticks are part of the count.
pub fn close_inline_code(text: &str) -> String {
    let mut repaired = text.to_string();
    if text.bytes().filter(|&b| b == b'`').count() % 2 != 0 {
        repaired.push('`');
    }
    repaired
}
