use super::{EventRenderer, Span, ThemeElement, create_style};
use crate::terminal::AnsiStyle;

impl<'a> EventRenderer<'a> {
    /// Style for inline text at the current nesting: the quote or body color
    /// with every open inline element layered on top.
    pub(crate) fn current_style(&self) -> AnsiStyle {
        let base = if self.blockquote_level > 0 {
            ThemeElement::Quote
        } else {
            ThemeElement::Text
        };

        self.formatting_stack
            .iter()
            .fold(create_style(self.theme, base), |style, element| {
                style.merge(&create_style(self.theme, *element))
            })
    }

    /// Inline whitespace from soft and hard breaks.
    pub(super) fn push_plain(&mut self, text: &str) {
        if let Some(table) = self.table_state.as_mut() {
            table.current_cell.push(' ');
            return;
        }

        let style = self.current_style();
        self.spans.push(Span::new(text, style));
    }

    /// Inline decoration with its own theme element, merged over the
    /// current style. Table cells receive the bare text.
    pub(super) fn push_styled(&mut self, text: &str, element: ThemeElement) {
        if let Some(table) = self.table_state.as_mut() {
            table.current_cell.push_str(text);
            return;
        }

        let style = self
            .current_style()
            .merge(&create_style(self.theme, element));
        self.spans.push(Span::new(text, style));
    }
}
