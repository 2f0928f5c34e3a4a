//! Terminal capability detection and table rendering.

use owo_colors::{OwoColorize, colors::css};

/// Detects whether colored output should be enabled
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Detects terminal width, returning None if not available
pub fn terminal_width() -> Option<u16> {
    terminal_size::terminal_size().map(|(w, _)| w.0)
}

/// Check if terminal is narrow (< 80 columns)
pub fn is_narrow() -> bool {
    terminal_width().is_some_and(|w| w < 80)
}

/// Extension trait for colorizing output
pub trait Colorize {
    /// Color as success (green)
    fn success(&self) -> String;
    /// Color as warning (amber)
    fn warning(&self) -> String;
    /// Color as info (blue)
    fn info(&self) -> String;
    /// Dim the text
    fn dim(&self) -> String;
}

impl Colorize for str {
    fn success(&self) -> String {
        if supports_color() {
            self.fg::<css::Green>().to_string()
        } else {
            self.to_string()
        }
    }

    fn warning(&self) -> String {
        if supports_color() {
            self.fg::<css::Orange>().to_string()
        } else {
            self.to_string()
        }
    }

    fn info(&self) -> String {
        if supports_color() {
            self.fg::<css::LightBlue>().to_string()
        } else {
            self.to_string()
        }
    }

    fn dim(&self) -> String {
        if supports_color() {
            self.dimmed().to_string()
        } else {
            self.to_string()
        }
    }
}

impl Colorize for String {
    fn success(&self) -> String {
        self.as_str().success()
    }

    fn warning(&self) -> String {
        self.as_str().warning()
    }

    fn info(&self) -> String {
        self.as_str().info()
    }

    fn dim(&self) -> String {
        self.as_str().dim()
    }
}

/// Pad or truncate `text` to exactly `width` display characters.
///
/// Widths are counted in characters, not bytes, so Cyrillic values do not
/// break the layout (beyond the usual caveats of wide glyphs).
pub fn format_cell(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count > width {
        let truncated: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{truncated}...")
    } else {
        let mut cell = text.to_string();
        cell.push_str(&" ".repeat(width - count));
        cell
    }
}

/// Center `text` within `width` characters.
pub fn center(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count >= width {
        return text.chars().take(width).collect();
    }
    let left = (width - count) / 2;
    let right = width - count - left;
    format!("{}{text}{}", " ".repeat(left), " ".repeat(right))
}

/// A horizontal rule of `width` repetitions of `symbol`.
pub fn rule(symbol: char, width: usize) -> String {
    std::iter::repeat_n(symbol, width).collect()
}

fn render_row(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (cell, &width) in cells.iter().zip(widths) {
        line.push(' ');
        line.push_str(&format_cell(cell, width));
        line.push_str(" |");
    }
    line
}

/// Print a boxed table with a header row.
pub fn print_table(headers: &[&str], widths: &[usize], rows: &[Vec<String>]) {
    let total: usize = widths.iter().map(|w| w + 3).sum::<usize>() + 1;
    let header_cells: Vec<String> = headers.iter().map(ToString::to_string).collect();

    println!("{}", rule('-', total));
    println!("{}", render_row(&header_cells, widths));
    println!("{}", rule('-', total));
    for row in rows {
        println!("{}", render_row(row, widths));
    }
    println!("{}", rule('-', total));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_pad_to_width_by_characters() {
        assert_eq!(format_cell("ab", 5), "ab   ");
        // Five Cyrillic characters count as five, not ten bytes.
        assert_eq!(format_cell("Иванов", 6), "Иванов");
    }

    #[test]
    fn cells_truncate_with_an_ellipsis() {
        assert_eq!(format_cell("abcdefgh", 5), "ab...");
    }

    #[test]
    fn centering_balances_padding() {
        assert_eq!(center("ab", 6), "  ab  ");
        assert_eq!(center("abc", 6), " abc  ");
    }
}
