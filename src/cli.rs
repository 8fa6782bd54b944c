use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "mdtail",
    version = env!("CARGO_PKG_VERSION"),
    about = "Streaming Markdown renderer - renders Markdown while it is still being written",
    long_about = r#"
mdtail renders Markdown that is still arriving. Every frame is repaired first:
unterminated code fences, inline code, links, images, emphasis and table rows
are closed so the partial document always renders cleanly.

Examples:
  llm "explain tcp" | mdtail            # Render a live token stream
  mdtail -f answer.md                   # Follow a file that is being written
  mdtail -R partial.md                  # Print the repaired Markdown and exit
  mdtail -k 8 -d 30 README.md           # Replay a file as a slow stream
"#
)]
pub struct Cli {
    /// Path to markdown file (use '-' for stdin)
    #[arg(value_name = "FILE")]
    pub filename: Option<String>,

    /// Alternative config file path
    #[arg(short = 'F', long = "config-file", value_name = "CONFIG_PATH")]
    pub config_file: Option<PathBuf>,

    /// Skip loading configuration files
    #[arg(short = 'n', long = "no-config")]
    pub no_config: bool,

    /// Strip all ANSI colors
    #[arg(short = 'A', long = "no-colors")]
    pub no_colors: bool,

    /// Wrap rendered text at this width (0 disables wrapping)
    #[arg(short = 'c', long = "cols")]
    pub cols: Option<usize>,

    /// Color theme
    #[arg(short = 't', long = "theme", value_enum, default_value = "auto")]
    pub theme: Option<ThemeMode>,

    /// Stream raw Markdown without rendering
    #[arg(short = 'r', long = "no-render")]
    pub raw: bool,

    /// Show a spinner while reading and print only once the input is complete
    #[arg(short = 'S', long = "no-stream")]
    pub no_stream: bool,

    /// Print the repaired Markdown of the whole input and exit
    #[arg(short = 'R', long = "repair-only")]
    pub repair_only: bool,

    /// Bytes per chunk when replaying input as a stream
    #[arg(short = 'k', long = "chunk-size", default_value = "32")]
    pub chunk_size: Option<usize>,

    /// Delay between chunks in milliseconds
    #[arg(short = 'd', long = "delay", value_name = "MS", default_value = "15")]
    pub delay_ms: Option<u64>,

    /// Follow FILE as it grows and redraw on every change
    #[arg(short = 'f', long = "follow", requires = "filename")]
    pub follow: bool,

    /// Disable one repair step (repeatable)
    #[arg(short = 'x', long = "skip", value_enum, value_name = "REPAIR")]
    pub skip: Vec<RepairKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeMode {
    #[value(help = "Detect light or dark background from the environment")]
    Auto,
    #[value(help = "Colors for light terminal backgrounds")]
    Light,
    #[value(help = "Colors for dark terminal backgrounds")]
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RepairKind {
    /// [alias: f] Close unterminated ``` code fences
    #[value(name = "fences", alias = "f")]
    Fences,
    /// [alias: c] Close unterminated `inline code`
    #[value(name = "inline-code", alias = "c")]
    InlineCode,
    /// [alias: l] Close link text and URLs
    #[value(name = "links", alias = "l")]
    Links,
    /// [alias: i] Close image alt text and URLs
    #[value(name = "images", alias = "i")]
    Images,
    /// [alias: e] Close emphasis and strikethrough markers
    #[value(name = "emphasis", alias = "e")]
    Emphasis,
    /// [alias: t] Pad table rows to the header's column count
    #[value(name = "tables", alias = "t")]
    Tables,
}
