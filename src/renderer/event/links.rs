use super::{CowStr, EventRenderer, ThemeElement};

impl<'a> EventRenderer<'a> {
    pub(super) fn handle_link_start(&mut self, dest_url: CowStr) {
        self.link_stack
            .push((dest_url.to_string(), self.spans.len()));
        self.formatting_stack.push(ThemeElement::Link);
    }

    /// Close a link, appending its target when it differs from the label.
    pub(super) fn handle_link_end(&mut self) {
        self.formatting_stack.pop();
        let Some((url, first_span)) = self.link_stack.pop() else {
            return;
        };

        if url.is_empty() || self.table_state.is_some() {
            return;
        }

        let label: String = self
            .spans
            .get(first_span..)
            .unwrap_or_default()
            .iter()
            .map(|span| span.text.as_str())
            .collect();
        if label.trim() == url {
            return;
        }

        let saved = std::mem::take(&mut self.formatting_stack);
        self.push_styled(&format!(" ({})", url), ThemeElement::TextLight);
        self.formatting_stack = saved;
    }

    pub(super) fn handle_image_start(&mut self) {
        self.push_styled("[image: ", ThemeElement::TextLight);
        self.formatting_stack.push(ThemeElement::TextLight);
    }

    pub(super) fn handle_image_end(&mut self) {
        self.formatting_stack.pop();
        self.push_styled("]", ThemeElement::TextLight);
    }
}
