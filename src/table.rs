use crate::theme::Theme;
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ContentArrangement, Table,
    modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
};
use crossterm::style::Color as CrosstermColor;
use pulldown_cmark::Alignment;

/// Table renderer using comfy-table for proper Unicode handling
pub struct TableRenderer<'a> {
    theme: &'a Theme,
    no_colors: bool,
    width: Option<usize>,
}

impl<'a> TableRenderer<'a> {
    pub fn new(theme: &'a Theme, no_colors: bool, width: Option<usize>) -> Self {
        Self {
            theme,
            no_colors,
            width,
        }
    }

    pub fn render(&self, headers: &[String], rows: &[Vec<String>], alignments: &[Alignment]) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS);

        match self.width {
            Some(width) => {
                table
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_width(width.min(u16::MAX as usize) as u16);
            }
            None => {
                table.set_content_arrangement(ContentArrangement::Disabled);
            }
        }

        if self.no_colors {
            table.force_no_tty();
        } else {
            table.enforce_styling();
        }

        let header_cells: Vec<Cell> = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let mut cell = Cell::new(header).set_alignment(cell_alignment(alignments, i));
                if !self.no_colors {
                    cell = cell
                        .fg(to_comfy_color(self.theme.table_header))
                        .add_attribute(Attribute::Bold);
                }
                cell
            })
            .collect();
        table.set_header(header_cells);

        for row in rows {
            let cells: Vec<Cell> = (0..headers.len().max(row.len()))
                .map(|i| {
                    let content = row.get(i).map(String::as_str).unwrap_or("");
                    Cell::new(content).set_alignment(cell_alignment(alignments, i))
                })
                .collect();
            table.add_row(cells);
        }

        table.to_string()
    }
}

fn cell_alignment(alignments: &[Alignment], column: usize) -> CellAlignment {
    match alignments.get(column) {
        Some(Alignment::Center) => CellAlignment::Center,
        Some(Alignment::Right) => CellAlignment::Right,
        _ => CellAlignment::Left,
    }
}

fn to_comfy_color(color: CrosstermColor) -> Color {
    match color {
        CrosstermColor::Black => Color::Black,
        CrosstermColor::DarkRed => Color::DarkRed,
        CrosstermColor::DarkGreen => Color::DarkGreen,
        CrosstermColor::DarkYellow => Color::DarkYellow,
        CrosstermColor::DarkBlue => Color::DarkBlue,
        CrosstermColor::DarkMagenta => Color::DarkMagenta,
        CrosstermColor::DarkCyan => Color::DarkCyan,
        CrosstermColor::Grey => Color::Grey,
        CrosstermColor::DarkGrey => Color::DarkGrey,
        CrosstermColor::Red => Color::Red,
        CrosstermColor::Green => Color::Green,
        CrosstermColor::Yellow => Color::Yellow,
        CrosstermColor::Blue => Color::Blue,
        CrosstermColor::Magenta => Color::Magenta,
        CrosstermColor::Cyan => Color::Cyan,
        CrosstermColor::White => Color::White,
        CrosstermColor::AnsiValue(value) => Color::AnsiValue(value),
        CrosstermColor::Rgb { r, g, b } => Color::Rgb { r, g, b },
        CrosstermColor::Reset => Color::Reset,
    }
}
