use super::event::EventRenderer;
use crate::config::Config;
use crate::markdown::MarkdownProcessor;
use crate::terminal::supports_color;
use crate::theme::Theme;
use anyhow::Result;

/// Renders a (possibly unfinished) Markdown buffer into terminal text.
pub struct TerminalRenderer {
    theme: Theme,
    no_colors: bool,
    width: Option<usize>,
    processor: MarkdownProcessor,
}

impl TerminalRenderer {
    pub fn new(config: &Config) -> Result<Self> {
        let theme = Theme::for_mode(config.theme);
        log::info!("Using '{}' theme", theme.name);

        let no_colors = config.no_colors || !supports_color();
        if no_colors && !config.no_colors {
            log::debug!("Terminal does not support colors; rendering plain text");
        }

        Ok(Self {
            theme,
            no_colors,
            width: config.wrap_width(),
            processor: MarkdownProcessor::new(config),
        })
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Repair the buffer, parse it and lay it out. Any prefix of a stream
    /// yields a well-formed frame.
    pub fn render(&self, raw: &str) -> Result<String> {
        let prepared = self.processor.prepare(raw);
        let events = self.processor.parse(&prepared);
        let mut renderer = EventRenderer::new(&self.theme, self.no_colors, self.width);
        renderer.render_events(events)
    }
}
