use super::{EventRenderer, MIN_WRAP_WIDTH, Result, TableRenderer};

impl<'a> EventRenderer<'a> {
    pub(super) fn handle_table_end(&mut self) -> Result<()> {
        let Some(table) = self.table_state.take() else {
            return Ok(());
        };

        self.begin_block();
        let (prefix, prefix_width) = self.line_prefix(false);
        let width = self
            .width
            .map(|w| w.saturating_sub(prefix_width).max(MIN_WRAP_WIDTH));

        let rendered = TableRenderer::new(self.theme, self.no_colors, width).render(
            &table.headers,
            &table.rows,
            &table.alignments,
        );
        for line in rendered.lines() {
            self.output.push_str(&prefix);
            self.output.push_str(line);
            self.output.push('\n');
        }

        self.separate_block();
        Ok(())
    }
}
