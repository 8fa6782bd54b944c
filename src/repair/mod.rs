//! Incremental repair of partially streamed Markdown.
//!
//! A buffer cut off mid-stream may end inside a code fence, an emphasis run,
//! a link or a table row. [`repair`] appends the closing tokens a full
//! renderer needs and leaves well-formed input byte-for-byte unchanged.
//!
//! The sub-repairs run in a fixed order because each one sees the output of
//! the previous one: fences, inline code, links, images, emphasis, tables.

pub mod code;
pub mod emphasis;
pub mod links;
pub mod table;

pub use code::{close_fences, close_inline_code};
pub use emphasis::{Marker, close_emphasis, open_markers};
pub use links::{close_images, close_links};
pub use table::pad_tables;

use serde::{Deserialize, Serialize};

/// Which sub-repairs are applied. Everything is on by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairOptions {
    pub fences: bool,
    pub inline_code: bool,
    pub links: bool,
    pub images: bool,
    pub emphasis: bool,
    pub tables: bool,
}

impl Default for RepairOptions {
    fn default() -> Self {
        Self {
            fences: true,
            inline_code: true,
            links: true,
            images: true,
            emphasis: true,
            tables: true,
        }
    }
}

impl RepairOptions {
    pub fn all_disabled(&self) -> bool {
        !(self.fences
            || self.inline_code
            || self.links
            || self.images
            || self.emphasis
            || self.tables)
    }
}

/// Runs the enabled sub-repairs in order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Repairer {
    options: RepairOptions,
}

impl Repairer {
    pub fn new(options: RepairOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> RepairOptions {
        self.options
    }

    pub fn repair(&self, raw: &str) -> String {
        let steps: [(bool, fn(&str) -> String); 6] = [
            (self.options.fences, close_fences),
            (self.options.inline_code, close_inline_code),
            (self.options.links, close_links),
            (self.options.images, close_images),
            (self.options.emphasis, close_emphasis),
            (self.options.tables, pad_tables),
        ];

        let mut text = raw.to_string();
        for (enabled, step) in steps {
            if enabled {
                text = step(&text);
            }
        }
        text
    }
}

/// Repair `raw` with every sub-repair enabled.
pub fn repair(raw: &str) -> String {
    Repairer::default().repair(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CASES: &[(&str, &str, &str)] = &[
        ("bold **", "This is **bold text", "This is **bold text**"),
        ("bold __", "This is __bold text", "This is __bold text__"),
        ("italic *", "This is *italic text", "This is *italic text*"),
        ("italic _", "This is _italic text", "This is _italic text_"),
        (
            "bold italic ***",
            "This is ***bold and italic text",
            "This is ***bold and italic text***",
        ),
        ("link text", "This is a [link text", "This is a [link text]"),
        (
            "link url",
            "This is a [link text](https://example.com",
            "This is a [link text](https://example.com)",
        ),
        ("inline code", "This is `inline code", "This is `inline code`"),
        (
            "code block",
            "Here is some code:\n```\nconst x = 10;",
            "Here is some code:\n```\nconst x = 10;\n```",
        ),
        (
            "nested bold italic",
            "This is **bold and _italic text",
            "This is **bold and _italic text_**",
        ),
        (
            "complete markdown",
            "This is **bold text** and *italic text*",
            "This is **bold text** and *italic text*",
        ),
        (
            "multiline unclosed link",
            "Start of text [link text](https://example.com) and **bold text**\n\nI am a new paragraph with *italic text*\n\nThis is the end of the text, with a [link to the end",
            "Start of text [link text](https://example.com) and **bold text**\n\nI am a new paragraph with *italic text*\n\nThis is the end of the text, with a [link to the end]",
        ),
        (
            "strikethrough",
            "This is ~~strikethrough text",
            "This is ~~strikethrough text~~",
        ),
        ("image", "![Alt text](", "![Alt text]()"),
        (
            "nested emphasis",
            "Some _italic and **bold text",
            "Some _italic and **bold text**_",
        ),
        (
            "code block with language",
            "```javascript\nconsole.log(\"Hello, world!\");",
            "```javascript\nconsole.log(\"Hello, world!\");\n```",
        ),
        ("heading", "### Heading level 3", "### Heading level 3"),
        ("horizontal rule", "Some text\n---", "Some text\n---"),
        (
            "table incomplete row",
            "| Header1 | Header2 |\n|---------|---------|\n| Row1Col1",
            "| Header1 | Header2 |\n|---------|---------|\n| Row1Col1 | |",
        ),
        ("tilde", "This is ~tilde emphasis", "This is ~tilde emphasis~"),
        (
            "image alt unclosed",
            "Here is an image ![alt text",
            "Here is an image ![alt text]",
        ),
        (
            "image url unclosed",
            "Image: ![alt](https://example.com/image.jpg",
            "Image: ![alt](https://example.com/image.jpg)",
        ),
        (
            "image alt and url",
            "Image: ![unclosed alt text](https://example.com",
            "Image: ![unclosed alt text](https://example.com)",
        ),
        (
            "multiple images",
            "![first image] and ![second unclosed",
            "![first image] and ![second unclosed]",
        ),
        ("image at start", "![unclosed image", "![unclosed image]"),
        ("image at end", "Text before ![unclosed", "Text before ![unclosed]"),
        ("empty image alt", "![](complete.jpg) and ![", "![](complete.jpg) and ![]"),
        (
            "nested image brackets",
            "Text ![alt with [nested] brackets",
            "Text ![alt with [nested] brackets",
        ),
        (
            "image complex url",
            "![alt](https://example.com/path?param=value&other=test",
            "![alt](https://example.com/path?param=value&other=test)",
        ),
        ("empty", "", ""),
    ];

    #[test]
    fn repairs_known_fragments() {
        for (name, input, expected) in CASES {
            assert_eq!(&repair(input), expected, "case: {name}");
        }
    }

    #[test]
    fn repairing_twice_changes_nothing() {
        for (name, input, _) in CASES {
            let once = repair(input);
            assert_eq!(repair(&once), once, "case: {name}");
        }
    }

    #[test]
    fn repaired_output_is_balanced() {
        for (name, input, _) in CASES {
            let out = repair(input);
            assert_eq!(out.matches("```").count() % 2, 0, "fences in {name}");
            assert_eq!(out.matches('`').count() % 2, 0, "backticks in {name}");
            assert!(open_markers(&out).is_empty(), "emphasis in {name}");
        }
    }

    #[test]
    fn later_steps_see_earlier_output() {
        // Link closer runs before emphasis, so `]` lands inside the bold run.
        assert_eq!(repair("**see [docs"), "**see [docs]**");
        // Emphasis closers land after the fence closer.
        assert_eq!(repair("*a\n```\ncode"), "*a\n```\ncode\n```*");
    }

    #[test]
    fn disabled_steps_are_skipped() {
        let options = RepairOptions {
            emphasis: false,
            ..RepairOptions::default()
        };
        let repairer = Repairer::new(options);
        assert_eq!(repairer.repair("**bold [link"), "**bold [link]");
        assert_eq!(repairer.options(), options);
    }

    #[test]
    fn all_disabled_is_identity() {
        let options = RepairOptions {
            fences: false,
            inline_code: false,
            links: false,
            images: false,
            emphasis: false,
            tables: false,
        };
        assert!(options.all_disabled());
        assert!(!RepairOptions::default().all_disabled());
        assert_eq!(Repairer::new(options).repair("**open `x [y"), "**open `x [y");
    }

    #[test]
    fn table_padding_sees_emphasis_closer() {
        assert_eq!(
            repair("| a | b |\n|---|---|\n| *x"),
            "| a | b |\n|---|---|\n| *x* | |"
        );
    }

    const STREAMED_DOCUMENTS: &[&str] = &[
        "# Report\n\nSome **bold** and `code` with [a link](https://x.io).\n\n\
         | col | val |\n|-----|-----|\n| a | 1 |\n\n```rust\nlet x = 1;\n```\n\n\
         > quote with ~~strike~~\n\n- item *one*\n- item ![img](p.png)\n",
        "## Notes\n\nUse __strong__ and _light_ text, ***both*** at once.\n\n\
         1. first `step`\n2. see ![diagram](d.png \"title\")\n\n```python\nprint('hi')\n```\n",
    ];

    fn prefixes(document: &str) -> impl Iterator<Item = &str> {
        document
            .char_indices()
            .map(|(idx, _)| idx)
            .chain(std::iter::once(document.len()))
            .map(move |end| &document[..end])
    }

    #[test]
    fn every_streamed_prefix_has_balanced_code() {
        for document in STREAMED_DOCUMENTS {
            for prefix in prefixes(document) {
                let out = repair(prefix);
                assert_eq!(out.matches("```").count() % 2, 0, "fences after {prefix:?}");
                assert_eq!(out.matches('`').count() % 2, 0, "backticks after {prefix:?}");
            }
        }
    }

    #[test]
    fn prefixes_outside_a_delimiter_run_are_stable() {
        for document in STREAMED_DOCUMENTS {
            for prefix in prefixes(document).filter(|p| !p.ends_with(['*', '_', '~'])) {
                let once = repair(prefix);
                assert_eq!(repair(&once), once, "second pass after {prefix:?}");
                assert!(open_markers(&once).is_empty(), "emphasis after {prefix:?}");
            }
        }
    }

    #[test]
    fn partial_delimiter_run_fuses_with_its_closers() {
        let bold = repair("**bold*");
        assert_eq!(bold, "**bold****");
        assert_eq!(
            open_markers(&bold),
            vec![Marker::StrongStar, Marker::StrongEmphasis, Marker::EmphasisStar]
        );
        assert_ne!(repair(&bold), bold);

        let tildes = repair("~~~");
        assert_eq!(tildes, "~~~~~~");
        assert_ne!(repair(&tildes), tildes);
    }

    #[test]
    fn inline_closer_can_complete_a_fence_marker() {
        let out = repair("` ``");
        assert_eq!(out, "` ```");
        assert_eq!(out.matches("```").count(), 1);
    }
}
