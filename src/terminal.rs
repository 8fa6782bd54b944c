use crate::config::mdtail_no_color_override;
use crate::error::MdtailError;
use crate::utils::{display_width, strip_ansi};
use anyhow::Result;
use crossterm::{
    QueueableCommand,
    cursor::{MoveToColumn, MoveUp},
    style::Color,
    terminal::{Clear, ClearType},
};
use std::io::Write;

/// Glyphs cycled while a stream is in flight.
pub const SPINNER_FRAMES: [char; 4] = ['|', '/', '-', '\\'];

/// Check if terminal supports color output
pub fn supports_color() -> bool {
    if let Some(no_color_override) = mdtail_no_color_override() {
        if no_color_override {
            return false;
        }
    }

    if std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty()) {
        return false;
    }

    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    true
}

/// ANSI color and style utilities
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnsiStyle {
    pub fg_color: Option<Color>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
}

impl AnsiStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fg(mut self, color: Color) -> Self {
        self.fg_color = Some(color);
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    pub fn strikethrough(mut self) -> Self {
        self.strikethrough = true;
        self
    }

    /// Layer `other` on top: its color wins, attributes accumulate.
    pub fn merge(&self, other: &AnsiStyle) -> AnsiStyle {
        AnsiStyle {
            fg_color: other.fg_color.or(self.fg_color),
            bold: self.bold || other.bold,
            italic: self.italic || other.italic,
            underline: self.underline || other.underline,
            strikethrough: self.strikethrough || other.strikethrough,
        }
    }

    pub fn is_plain(&self) -> bool {
        *self == AnsiStyle::default()
    }

    pub fn apply(&self, text: &str, no_colors: bool) -> String {
        if no_colors || self.is_plain() || text.is_empty() {
            return text.to_string();
        }

        let mut result = String::new();

        if let Some(fg) = self.fg_color {
            match fg {
                Color::AnsiValue(n) => {
                    result.push_str(&format!("\x1b[38;5;{}m", n));
                }
                Color::Rgb { r, g, b } => {
                    result.push_str(&format!("\x1b[38;2;{};{};{}m", r, g, b));
                }
                _ => {
                    result.push_str(&format!("\x1b[{}m", color_to_ansi_fg(fg)));
                }
            }
        }

        if self.bold {
            result.push_str("\x1b[1m");
        }
        if self.italic {
            result.push_str("\x1b[3m");
        }
        if self.underline {
            result.push_str("\x1b[4m");
        }
        if self.strikethrough {
            result.push_str("\x1b[9m");
        }

        result.push_str(text);
        result.push_str("\x1b[0m");

        result
    }
}

fn color_to_ansi_fg(color: Color) -> u8 {
    match color {
        Color::Black => 30,
        Color::DarkRed => 31,
        Color::DarkGreen => 32,
        Color::DarkYellow => 33,
        Color::DarkBlue => 34,
        Color::DarkMagenta => 35,
        Color::DarkCyan => 36,
        Color::Grey => 37,
        Color::DarkGrey => 90,
        Color::Red => 91,
        Color::Green => 92,
        Color::Yellow => 93,
        Color::Blue => 94,
        Color::Magenta => 95,
        Color::Cyan => 96,
        Color::White => 97,
        Color::AnsiValue(n) => n,
        Color::Rgb { .. } => unreachable!("RGB colors are handled as truecolor sequences"),
        Color::Reset => 39,
    }
}

/// Number of terminal rows `text` occupies at `width` columns, counting the
/// row the cursor is left on after a trailing newline.
pub fn count_visual_lines(text: &str, width: usize) -> usize {
    let width = width.max(1);
    strip_ansi(text)
        .split('\n')
        .map(|line| {
            let cols = display_width(line);
            if cols == 0 { 1 } else { cols.div_ceil(width) }
        })
        .sum()
}

/// Redraws a frame in place: erases the rows the previous frame used, then
/// writes the next one.
pub struct FrameWriter<W: Write> {
    out: W,
    width: usize,
    prev_lines: usize,
    redraw: bool,
}

impl<W: Write> FrameWriter<W> {
    pub fn new(out: W, width: usize) -> Self {
        Self {
            out,
            width,
            prev_lines: 0,
            redraw: true,
        }
    }

    /// Write each frame after the last one with no cursor movement, for
    /// output that is not a terminal.
    pub fn append_only(mut self) -> Self {
        self.redraw = false;
        self
    }

    /// Rows occupied by the last frame drawn.
    pub fn prev_lines(&self) -> usize {
        self.prev_lines
    }

    pub fn draw(&mut self, frame: &str) -> Result<()> {
        if self.redraw {
            self.erase()?;
        }
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()?;
        self.prev_lines = count_visual_lines(frame, self.width);
        Ok(())
    }

    fn erase(&mut self) -> Result<()> {
        for row in 0..self.prev_lines {
            self.out
                .queue(Clear(ClearType::CurrentLine))
                .map_err(|e| MdtailError::TerminalError(e.to_string()))?;
            if row + 1 < self.prev_lines {
                self.out
                    .queue(MoveUp(1))
                    .map_err(|e| MdtailError::TerminalError(e.to_string()))?;
            }
        }
        self.out
            .queue(MoveToColumn(0))
            .map_err(|e| MdtailError::TerminalError(e.to_string()))?;
        Ok(())
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Cycles through [`SPINNER_FRAMES`].
#[derive(Debug, Default)]
pub struct Spinner {
    index: usize,
}

impl Spinner {
    pub fn next_frame(&mut self) -> char {
        let frame = SPINNER_FRAMES[self.index % SPINNER_FRAMES.len()];
        self.index += 1;
        frame
    }
}
