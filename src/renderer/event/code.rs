use super::{EventRenderer, Result, ThemeElement, create_style};

impl<'a> EventRenderer<'a> {
    /// Draw a finished code block inside a left border, labelled with its
    /// language when one was given.
    pub(super) fn handle_code_block_end(&mut self) -> Result<()> {
        let Some(block) = self.code_block.take() else {
            return Ok(());
        };

        self.begin_block();
        let (first_prefix, _) = self.line_prefix(true);
        let (rest_prefix, _) = self.line_prefix(false);

        let border = create_style(self.theme, ThemeElement::Border);
        let code = create_style(self.theme, ThemeElement::CodeBlock);

        let label = match block.language.as_deref() {
            Some(lang) => format!("╭─ {}", lang),
            None => "╭─".to_string(),
        };
        self.output.push_str(&first_prefix);
        self.output.push_str(&border.apply(&label, self.no_colors));
        self.output.push('\n');

        for line in block.content.trim_end_matches('\n').lines() {
            self.output.push_str(&rest_prefix);
            self.output.push_str(&border.apply("│ ", self.no_colors));
            self.output.push_str(&code.apply(line, self.no_colors));
            self.output.push('\n');
        }

        self.output.push_str(&rest_prefix);
        self.output.push_str(&border.apply("╰─", self.no_colors));
        self.output.push('\n');

        if self.list_stack.is_empty() {
            self.separate_block();
        }
        Ok(())
    }
}
