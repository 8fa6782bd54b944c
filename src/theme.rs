use crate::cli::ThemeMode;
use crate::terminal::AnsiStyle;
use crossterm::style::Color;
use pulldown_cmark::HeadingLevel;

/// Colors used when rendering a frame.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,

    pub text: Color,
    pub text_light: Color,

    pub h1: Color,
    pub h2: Color,
    pub h3: Color,
    pub h4: Color,
    pub h5: Color,
    pub h6: Color,

    pub code: Color,
    pub code_block: Color,
    pub quote: Color,
    pub link: Color,
    pub emphasis: Color,
    pub strong: Color,
    pub strikethrough: Color,

    pub border: Color,
    pub list_marker: Color,
    pub table_header: Color,
    pub spinner: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark",
            text: Color::White,
            text_light: Color::Grey,
            h1: Color::Red,
            h2: Color::Green,
            h3: Color::Yellow,
            h4: Color::Blue,
            h5: Color::Magenta,
            h6: Color::Cyan,
            code: Color::AnsiValue(180),
            code_block: Color::AnsiValue(252),
            quote: Color::AnsiValue(109),
            link: Color::AnsiValue(75),
            emphasis: Color::Yellow,
            strong: Color::Red,
            strikethrough: Color::DarkGrey,
            border: Color::AnsiValue(240),
            list_marker: Color::Green,
            table_header: Color::Yellow,
            spinner: Color::Cyan,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light",
            text: Color::Black,
            text_light: Color::DarkGrey,
            h1: Color::DarkRed,
            h2: Color::DarkGreen,
            h3: Color::AnsiValue(130),
            h4: Color::DarkBlue,
            h5: Color::DarkMagenta,
            h6: Color::DarkCyan,
            code: Color::AnsiValue(124),
            code_block: Color::AnsiValue(236),
            quote: Color::AnsiValue(66),
            link: Color::AnsiValue(26),
            emphasis: Color::AnsiValue(130),
            strong: Color::DarkRed,
            strikethrough: Color::Grey,
            border: Color::AnsiValue(248),
            list_marker: Color::DarkGreen,
            table_header: Color::AnsiValue(130),
            spinner: Color::DarkCyan,
        }
    }

    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Auto => {
                if detect_light_background() {
                    Self::light()
                } else {
                    Self::dark()
                }
            }
        }
    }
}

/// Guess whether the terminal has a light background.
pub fn detect_light_background() -> bool {
    detect_light_background_with(|key| std::env::var(key).ok())
}

fn detect_light_background_with<F>(env: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    // COLORFGBG is "fg;bg" (sometimes "fg;default;bg"); 7 and up are light.
    if let Some(colorfgbg) = env("COLORFGBG") {
        if let Some(bg) = colorfgbg
            .rsplit(';')
            .next()
            .and_then(|bg| bg.trim().parse::<u8>().ok())
        {
            log::debug!("COLORFGBG background index {bg}");
            return bg >= 7;
        }
    }

    matches!(env("TERM_PROGRAM").as_deref(), Some("Apple_Terminal"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeElement {
    Text,
    TextLight,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Code,
    CodeBlock,
    Quote,
    Link,
    Emphasis,
    Strong,
    Strikethrough,
    Border,
    ListMarker,
    TableHeader,
    Spinner,
}

impl ThemeElement {
    pub fn heading(level: HeadingLevel) -> Self {
        match level {
            HeadingLevel::H1 => ThemeElement::H1,
            HeadingLevel::H2 => ThemeElement::H2,
            HeadingLevel::H3 => ThemeElement::H3,
            HeadingLevel::H4 => ThemeElement::H4,
            HeadingLevel::H5 => ThemeElement::H5,
            HeadingLevel::H6 => ThemeElement::H6,
        }
    }
}

pub fn create_style(theme: &Theme, element: ThemeElement) -> AnsiStyle {
    let color = match element {
        ThemeElement::Text => theme.text,
        ThemeElement::TextLight => theme.text_light,
        ThemeElement::H1 => theme.h1,
        ThemeElement::H2 => theme.h2,
        ThemeElement::H3 => theme.h3,
        ThemeElement::H4 => theme.h4,
        ThemeElement::H5 => theme.h5,
        ThemeElement::H6 => theme.h6,
        ThemeElement::Code => theme.code,
        ThemeElement::CodeBlock => theme.code_block,
        ThemeElement::Quote => theme.quote,
        ThemeElement::Link => theme.link,
        ThemeElement::Emphasis => theme.emphasis,
        ThemeElement::Strong => theme.strong,
        ThemeElement::Strikethrough => theme.strikethrough,
        ThemeElement::Border => theme.border,
        ThemeElement::ListMarker => theme.list_marker,
        ThemeElement::TableHeader => theme.table_header,
        ThemeElement::Spinner => theme.spinner,
    };

    let style = AnsiStyle::new().fg(color);

    match element {
        ThemeElement::Strong
        | ThemeElement::H1
        | ThemeElement::H2
        | ThemeElement::H3
        | ThemeElement::TableHeader => style.bold(),
        ThemeElement::Emphasis => style.italic(),
        ThemeElement::Strikethrough => style.strikethrough(),
        ThemeElement::Link => style.underline(),
        _ => style,
    }
}
