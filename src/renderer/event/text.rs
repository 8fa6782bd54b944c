use super::{EventRenderer, MIN_WRAP_WIDTH, ThemeElement, create_style};
use crate::terminal::AnsiStyle;
use crate::utils::display_width;

/// A run of inline text sharing one style.
#[derive(Debug, Clone)]
pub(crate) struct Span {
    pub(crate) text: String,
    pub(crate) style: AnsiStyle,
}

impl Span {
    pub(crate) fn new(text: impl Into<String>, style: AnsiStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

#[derive(Debug, PartialEq)]
enum Piece<'s> {
    Word(&'s str),
    Space,
    Break,
}

fn pieces(text: &str) -> Vec<Piece<'_>> {
    let mut result = Vec::new();
    let mut word_start: Option<usize> = None;

    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(start) = word_start.take() {
                result.push(Piece::Word(&text[start..idx]));
            }
            if ch == '\n' {
                result.push(Piece::Break);
            } else if result.last() != Some(&Piece::Space) {
                result.push(Piece::Space);
            }
        } else if word_start.is_none() {
            word_start = Some(idx);
        }
    }

    if let Some(start) = word_start {
        result.push(Piece::Word(&text[start..]));
    }

    result
}

/// Greedy word wrap over styled spans. Spaces are deferred so no line starts
/// or ends with one; words wider than `width` overflow on their own line.
pub(crate) fn wrap_spans(spans: &[Span], width: Option<usize>, no_colors: bool) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_width = 0usize;
    let mut pending_space = false;

    for span in spans {
        for piece in pieces(&span.text) {
            match piece {
                Piece::Break => {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0;
                    pending_space = false;
                }
                Piece::Space => {
                    if line_width > 0 {
                        pending_space = true;
                    }
                }
                Piece::Word(word) => {
                    let word_width = display_width(word);
                    let needed = word_width + usize::from(pending_space);
                    if let Some(limit) = width
                        && line_width > 0
                        && line_width + needed > limit
                    {
                        lines.push(std::mem::take(&mut line));
                        line_width = 0;
                        pending_space = false;
                    }
                    if pending_space {
                        line.push(' ');
                        line_width += 1;
                        pending_space = false;
                    }
                    line.push_str(&span.style.apply(word, no_colors));
                    line_width += word_width;
                }
            }
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }

    lines
}

impl<'a> EventRenderer<'a> {
    /// Write the collected inline spans as wrapped, prefixed lines.
    pub(crate) fn flush_block(&mut self) {
        if self.spans.is_empty() {
            return;
        }

        let spans = std::mem::take(&mut self.spans);
        let (first_prefix, _) = self.line_prefix(true);
        let (rest_prefix, rest_width) = self.line_prefix(false);
        let width = self
            .width
            .map(|w| w.saturating_sub(rest_width).max(MIN_WRAP_WIDTH));

        let lines = wrap_spans(&spans, width, self.no_colors);
        if lines.is_empty() {
            return;
        }

        self.begin_block();
        for (idx, line) in lines.iter().enumerate() {
            let prefix = if idx == 0 { &first_prefix } else { &rest_prefix };
            self.output.push_str(prefix);
            self.output.push_str(line);
            self.output.push('\n');
        }
    }

    /// Prefix for a line of the current block: quote bars, list indentation
    /// and, for the first line of an item, its marker. Returns the styled
    /// prefix and its display width.
    pub(crate) fn line_prefix(&mut self, first: bool) -> (String, usize) {
        let (mut prefix, mut width) = self.quote_prefix();

        if let Some((last, outer)) = self.list_stack.split_last() {
            let indent: usize = outer.iter().map(|list| list.marker_width).sum();
            prefix.push_str(&" ".repeat(indent));
            width += indent;

            let marker = if first { self.pending_marker.take() } else { None };
            match marker {
                Some(marker) => {
                    let style = create_style(self.theme, ThemeElement::ListMarker);
                    prefix.push_str(&style.apply(&marker, self.no_colors));
                    width += display_width(&marker);
                }
                None => {
                    prefix.push_str(&" ".repeat(last.marker_width));
                    width += last.marker_width;
                }
            }
        }

        (prefix, width)
    }

    fn quote_prefix(&self) -> (String, usize) {
        if self.blockquote_level == 0 {
            return (String::new(), 0);
        }

        let style = create_style(self.theme, ThemeElement::Quote);
        let bar = style.apply("│", self.no_colors);
        let prefix = format!("{} ", bar).repeat(self.blockquote_level);
        (prefix, self.blockquote_level * 2)
    }

    /// Emit the blank separator line owed by the previous block, if any.
    pub(crate) fn begin_block(&mut self) {
        if !self.pending_gap {
            return;
        }
        self.pending_gap = false;

        if self.blockquote_level > 0 {
            let style = create_style(self.theme, ThemeElement::Quote);
            let bars = vec!["│"; self.blockquote_level].join(" ");
            self.output.push_str(&style.apply(&bars, self.no_colors));
        }
        self.output.push('\n');
    }

    pub(crate) fn separate_block(&mut self) {
        if !self.output.is_empty() {
            self.pending_gap = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> Span {
        Span::new(text, AnsiStyle::default())
    }

    #[test]
    fn splits_words_spaces_and_breaks() {
        assert_eq!(
            pieces("a  b\nc"),
            vec![
                Piece::Word("a"),
                Piece::Space,
                Piece::Word("b"),
                Piece::Break,
                Piece::Word("c"),
            ]
        );
    }

    #[test]
    fn wraps_at_width_without_dangling_spaces() {
        let lines = wrap_spans(&[plain("one two three four")], Some(9), true);
        assert_eq!(lines, vec!["one two", "three", "four"]);
    }

    #[test]
    fn unlimited_width_keeps_one_line() {
        let lines = wrap_spans(&[plain("one two three four")], None, true);
        assert_eq!(lines, vec!["one two three four"]);
    }

    #[test]
    fn spaces_between_spans_are_kept() {
        let lines = wrap_spans(&[plain("Hello "), plain("world")], Some(80), true);
        assert_eq!(lines, vec!["Hello world"]);
    }

    #[test]
    fn long_word_overflows_on_its_own_line() {
        let lines = wrap_spans(&[plain("a supercalifragilistic b")], Some(5), true);
        assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn wide_characters_count_double() {
        let lines = wrap_spans(&[plain("日本 語")], Some(4), true);
        assert_eq!(lines, vec!["日本", "語"]);
    }

    #[test]
    fn styles_apply_per_word() {
        let style = AnsiStyle::new().bold();
        let lines = wrap_spans(&[Span::new("a b", style)], None, false);
        assert_eq!(lines, vec!["\x1b[1ma\x1b[0m \x1b[1mb\x1b[0m"]);
    }
}
