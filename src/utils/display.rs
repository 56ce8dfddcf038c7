//! Terminal display utilities for width-aware text layout.
//!
//! Titles and author lists from the catalog can be long and contain wide
//! characters, so everything here measures with `unicode-width`.

use terminal_size::terminal_size;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Default width when terminal size cannot be determined.
pub const DEFAULT_WIDTH: usize = 100;

/// Default height when terminal size cannot be determined.
pub const DEFAULT_HEIGHT: usize = 24;

/// Current terminal size as `(columns, rows)`.
pub fn terminal_dimensions() -> (usize, usize) {
    terminal_size()
        .map(|(w, h)| (w.0 as usize, h.0 as usize))
        .unwrap_or((DEFAULT_WIDTH, DEFAULT_HEIGHT))
}

/// Truncate text to fit within `max_width` display columns.
///
/// Appends an ellipsis if truncation occurred.
///
/// ```
/// use book_finder::utils::truncate_with_ellipsis;
///
/// assert_eq!(truncate_with_ellipsis("Hello World", 8), "Hello...");
/// assert_eq!(truncate_with_ellipsis("Hi", 8), "Hi");
/// ```
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }

    if text.width() <= max_width {
        return text.to_string();
    }

    let budget = max_width.saturating_sub(3);
    let mut current_width = 0;
    let mut truncated = String::new();

    for c in text.chars() {
        let w = c.width().unwrap_or(1);
        if current_width + w > budget {
            break;
        }
        current_width += w;
        truncated.push(c);
    }

    format!("{}...", truncated)
}

/// Truncate text at the last word boundary that fits.
///
/// Falls back to [`truncate_with_ellipsis`] when the first word alone is too
/// wide.
pub fn truncate_at_word(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }

    if text.width() <= max_width {
        return text.to_string();
    }

    let budget = max_width.saturating_sub(3);
    let mut current_width = 0;
    let mut last_space = None;

    for (idx, c) in text.char_indices() {
        if c == ' ' {
            last_space = Some(idx);
        }
        let w = c.width().unwrap_or(1);
        if current_width + w > budget {
            break;
        }
        current_width += w;
    }

    match last_space {
        Some(idx) if !text[..idx].trim_end().is_empty() => {
            format!("{}...", text[..idx].trim_end())
        }
        _ => truncate_with_ellipsis(text, max_width),
    }
}

/// Greedy word wrap to `width` display columns.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(10);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if !line.is_empty() && line.width() + 1 + word.width() > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

/// Column widths for the result table as `(title, authors, year)`.
///
/// Title gets two thirds of the flexible space, authors one third; the year
/// and index columns are fixed.
pub fn book_table_columns(terminal_width: usize) -> (usize, usize, usize) {
    const INDEX: usize = 5;
    const YEAR: usize = 8;
    const CHROME: usize = 10;

    let flexible = terminal_width.saturating_sub(INDEX + YEAR + CHROME).max(30);
    let title = (flexible * 2 / 3).max(20);
    let authors = flexible.saturating_sub(title).max(10);
    (title, authors, YEAR)
}
