use crate::config::Config;
use crate::repair::Repairer;
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser};

const TAB_WIDTH: usize = 4;

/// Turns a raw, possibly unfinished buffer into parser events.
pub struct MarkdownProcessor {
    repairer: Repairer,
    options: Options,
}

impl MarkdownProcessor {
    pub fn new(config: &Config) -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        if config.repairs.all_disabled() {
            log::info!("All repairs disabled; frames render the raw buffer");
        }

        Self {
            repairer: Repairer::new(config.repairs),
            options,
        }
    }

    /// Repair the buffer and normalize tabs so every frame parses cleanly.
    pub fn prepare(&self, raw: &str) -> String {
        let repaired = self.repairer.repair(raw);
        if repaired.contains('\t') {
            repaired.replace('\t', &" ".repeat(TAB_WIDTH))
        } else {
            repaired
        }
    }

    pub fn parse<'a>(&self, prepared: &'a str) -> Vec<Event<'a>> {
        Parser::new_ext(prepared, self.options).collect()
    }
}

/// Extract language from code block
pub fn extract_code_language(kind: &CodeBlockKind) -> Option<String> {
    match kind {
        CodeBlockKind::Fenced(lang) => {
            let lang = lang.split_whitespace().next()?;
            let lang = lang.strip_prefix("language-").unwrap_or(lang);
            if lang.is_empty() {
                None
            } else {
                Some(lang.to_string())
            }
        }
        CodeBlockKind::Indented => None,
    }
}
