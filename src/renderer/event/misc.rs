use super::{CowStr, EventRenderer, Result, ThemeElement, create_style};

const DEFAULT_RULE_WIDTH: usize = 40;

impl<'a> EventRenderer<'a> {
    pub(super) fn handle_html(&mut self, html: CowStr) -> Result<()> {
        self.push_styled(&html, ThemeElement::TextLight);
        Ok(())
    }

    pub(super) fn handle_inline_html(&mut self, html: CowStr) -> Result<()> {
        self.push_styled(&html, ThemeElement::TextLight);
        Ok(())
    }

    pub(super) fn handle_horizontal_rule(&mut self) -> Result<()> {
        self.flush_block();
        self.begin_block();

        let (prefix, prefix_width) = self.line_prefix(true);
        let width = self
            .width
            .map(|w| w.saturating_sub(prefix_width))
            .unwrap_or(DEFAULT_RULE_WIDTH);
        let style = create_style(self.theme, ThemeElement::Border);

        self.output.push_str(&prefix);
        self.output
            .push_str(&style.apply(&"─".repeat(width.max(1)), self.no_colors));
        self.output.push('\n');
        self.separate_block();
        Ok(())
    }

    pub(super) fn handle_footnote_reference(&mut self, name: CowStr) -> Result<()> {
        self.push_styled(&format!("[^{}]", name), ThemeElement::Link);
        Ok(())
    }

    pub(super) fn handle_task_list_marker(&mut self, checked: bool) -> Result<()> {
        let marker = if checked { "[✓] " } else { "[ ] " };
        self.push_styled(marker, ThemeElement::ListMarker);
        Ok(())
    }
}
