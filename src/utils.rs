use once_cell::sync::Lazy;
use regex::Regex;
use unicode_width::UnicodeWidthStr;

static ANSI_CSI: Lazy<Regex> = Lazy::new(|| compile(r"\x1b\[[0-9;?]*[A-Za-z]"));
static OSC8: Lazy<Regex> = Lazy::new(|| compile(r"\x1b\]8;[^\x1b]*\x1b\\"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|err| panic!("invalid ANSI pattern {pattern}: {err}"))
}

/// Calculate the display width of a string, accounting for Unicode characters
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Remove color codes, cursor movement and OSC 8 hyperlinks.
pub fn strip_ansi(s: &str) -> String {
    let without_csi = ANSI_CSI.replace_all(s, "");
    OSC8.replace_all(&without_csi, "").into_owned()
}

pub fn strip_leading_bom(text: &mut String) {
    const UTF8_BOM: char = '\u{FEFF}';
    while text.starts_with(UTF8_BOM) {
        // Standard PowerShell adds a UTF-8 BOM when piping text.
        text.drain(..UTF8_BOM.len_utf8());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_width() {
        assert_eq!(display_width("hello"), 5);
        assert_eq!(display_width("日本"), 4);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn strip_ansi_removes_colors_and_cursor_codes() {
        assert_eq!(strip_ansi("\x1b[38;5;102mcode\x1b[0m"), "code");
        assert_eq!(strip_ansi("\x1b[2K\x1b[1A\x1b[1Gtext"), "text");
        assert_eq!(
            strip_ansi("\x1b]8;;https://example.com\x1b\\link\x1b]8;;\x1b\\"),
            "link"
        );
    }

    #[test]
    fn bom_is_stripped_repeatedly() {
        let mut text = String::from("\u{feff}\u{feff}# Title");
        strip_leading_bom(&mut text);
        assert_eq!(text, "# Title");
    }
}
