use super::{
    CowStr, Event, Result, Span, Tag, TagEnd, Theme, ThemeElement, create_style,
    extract_code_language,
};
use pulldown_cmark::Alignment;

#[derive(Debug)]
pub(crate) struct ListState {
    pub(super) ordered: bool,
    pub(super) counter: u64,
    pub(super) marker_width: usize,
}

#[derive(Debug, Default)]
pub(crate) struct TableState {
    pub(super) alignments: Vec<Alignment>,
    pub(super) headers: Vec<String>,
    pub(super) rows: Vec<Vec<String>>,
    pub(super) current_row: Vec<String>,
    pub(super) current_cell: String,
}

#[derive(Debug)]
pub(crate) struct CodeBlockState {
    pub(super) language: Option<String>,
    pub(super) content: String,
}

/// Internal event renderer
pub(crate) struct EventRenderer<'a> {
    pub(crate) theme: &'a Theme,
    pub(crate) no_colors: bool,
    pub(crate) width: Option<usize>,
    pub(crate) output: String,
    pub(crate) spans: Vec<Span>,
    pub(crate) formatting_stack: Vec<ThemeElement>,
    pub(crate) list_stack: Vec<ListState>,
    pub(crate) pending_marker: Option<String>,
    pub(crate) blockquote_level: usize,
    pub(crate) code_block: Option<CodeBlockState>,
    pub(crate) table_state: Option<TableState>,
    pub(crate) link_stack: Vec<(String, usize)>,
    pub(crate) pending_gap: bool,
}

impl<'a> EventRenderer<'a> {
    pub(crate) fn new(theme: &'a Theme, no_colors: bool, width: Option<usize>) -> Self {
        Self {
            theme,
            no_colors,
            width,
            output: String::new(),
            spans: Vec::new(),
            formatting_stack: Vec::new(),
            list_stack: Vec::new(),
            pending_marker: None,
            blockquote_level: 0,
            code_block: None,
            table_state: None,
            link_stack: Vec::new(),
            pending_gap: false,
        }
    }

    pub(crate) fn render_events<'e, I>(&mut self, events: I) -> Result<String>
    where
        I: IntoIterator<Item = Event<'e>>,
    {
        for event in events {
            self.process_event(event)?;
        }
        self.flush_block();

        // Remove excessive trailing newlines, but keep one
        let mut result = self.output.trim_end().to_string();
        if !result.is_empty() {
            result.push('\n');
        }

        Ok(result)
    }

    fn process_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Start(tag) => self.handle_start_tag(tag)?,
            Event::End(tag_end) => self.handle_end_tag(tag_end)?,
            Event::Text(text) => self.handle_text(text)?,
            Event::Code(code) => self.handle_inline_code(code)?,
            Event::Html(html) => self.handle_html(html)?,
            Event::InlineHtml(html) => self.handle_inline_html(html)?,
            Event::SoftBreak => self.push_plain(" "),
            Event::HardBreak => self.push_plain("\n"),
            Event::Rule => self.handle_horizontal_rule()?,
            Event::FootnoteReference(name) => self.handle_footnote_reference(name)?,
            Event::TaskListMarker(checked) => self.handle_task_list_marker(checked)?,
            Event::InlineMath(math) | Event::DisplayMath(math) => self.handle_text(math)?,
        }
        Ok(())
    }

    fn handle_start_tag(&mut self, tag: Tag) -> Result<()> {
        match tag {
            Tag::Paragraph => {}
            Tag::Heading { level, .. } => {
                self.flush_block();
                let element = ThemeElement::heading(level);
                let marks = format!("{} ", "#".repeat(level as usize));
                let style = create_style(self.theme, element);
                self.spans.push(Span::new(marks, style));
                self.formatting_stack.push(element);
            }
            Tag::BlockQuote(_) => {
                self.flush_block();
                self.blockquote_level += 1;
            }
            Tag::CodeBlock(kind) => {
                self.flush_block();
                self.code_block = Some(CodeBlockState {
                    language: extract_code_language(&kind),
                    content: String::new(),
                });
            }
            Tag::List(start) => {
                self.flush_block();
                self.list_stack.push(ListState {
                    ordered: start.is_some(),
                    counter: start.unwrap_or(1),
                    marker_width: 0,
                });
            }
            Tag::Item => {
                self.flush_block();
                self.start_list_item();
            }
            Tag::Table(alignments) => {
                self.flush_block();
                self.table_state = Some(TableState {
                    alignments,
                    ..TableState::default()
                });
            }
            Tag::TableHead | Tag::TableRow => {
                if let Some(table) = self.table_state.as_mut() {
                    table.current_row.clear();
                }
            }
            Tag::TableCell => {
                if let Some(table) = self.table_state.as_mut() {
                    table.current_cell.clear();
                }
            }
            Tag::Emphasis => self.formatting_stack.push(ThemeElement::Emphasis),
            Tag::Strong => self.formatting_stack.push(ThemeElement::Strong),
            Tag::Strikethrough => self.formatting_stack.push(ThemeElement::Strikethrough),
            Tag::Link { dest_url, .. } => self.handle_link_start(dest_url),
            Tag::Image { .. } => self.handle_image_start(),
            Tag::FootnoteDefinition(name) => {
                self.flush_block();
                let style = create_style(self.theme, ThemeElement::Link);
                self.spans.push(Span::new(format!("[^{}]: ", name), style));
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_end_tag(&mut self, tag_end: TagEnd) -> Result<()> {
        match tag_end {
            TagEnd::Paragraph => {
                self.flush_block();
                if self.list_stack.is_empty() {
                    self.separate_block();
                }
            }
            TagEnd::Heading(_) => {
                self.formatting_stack.pop();
                self.flush_block();
                self.separate_block();
            }
            TagEnd::BlockQuote(_) => {
                self.flush_block();
                self.blockquote_level = self.blockquote_level.saturating_sub(1);
                if self.blockquote_level == 0 {
                    self.separate_block();
                }
            }
            TagEnd::CodeBlock => self.handle_code_block_end()?,
            TagEnd::List(_) => {
                self.flush_block();
                self.list_stack.pop();
                if self.list_stack.is_empty() {
                    self.separate_block();
                }
            }
            TagEnd::Item => {
                self.flush_block();
                self.pending_marker = None;
            }
            TagEnd::Table => self.handle_table_end()?,
            TagEnd::TableHead => {
                if let Some(table) = self.table_state.as_mut() {
                    table.headers = std::mem::take(&mut table.current_row);
                }
            }
            TagEnd::TableRow => {
                if let Some(table) = self.table_state.as_mut() {
                    let row = std::mem::take(&mut table.current_row);
                    table.rows.push(row);
                }
            }
            TagEnd::TableCell => {
                if let Some(table) = self.table_state.as_mut() {
                    let cell = std::mem::take(&mut table.current_cell);
                    table.current_row.push(cell.trim().to_string());
                }
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.formatting_stack.pop();
            }
            TagEnd::Link => self.handle_link_end(),
            TagEnd::Image => self.handle_image_end(),
            TagEnd::FootnoteDefinition | TagEnd::HtmlBlock => {
                self.flush_block();
                self.separate_block();
            }
            _ => {}
        }
        Ok(())
    }

    fn start_list_item(&mut self) {
        let Some(list) = self.list_stack.last_mut() else {
            return;
        };

        let marker = if list.ordered {
            let marker = format!("{}. ", list.counter);
            list.counter += 1;
            marker
        } else {
            "• ".to_string()
        };
        list.marker_width = crate::utils::display_width(&marker);
        self.pending_marker = Some(marker);
    }

    fn handle_text(&mut self, text: CowStr) -> Result<()> {
        if let Some(block) = self.code_block.as_mut() {
            block.content.push_str(&text);
            return Ok(());
        }

        if let Some(table) = self.table_state.as_mut() {
            table.current_cell.push_str(&text);
            return Ok(());
        }

        let style = self.current_style();
        self.spans.push(Span::new(text.to_string(), style));
        Ok(())
    }

    fn handle_inline_code(&mut self, code: CowStr) -> Result<()> {
        if let Some(table) = self.table_state.as_mut() {
            table.current_cell.push_str(&code);
            return Ok(());
        }

        let style = self
            .current_style()
            .merge(&create_style(self.theme, ThemeElement::Code));
        self.spans.push(Span::new(code.to_string(), style));
        Ok(())
    }
}
