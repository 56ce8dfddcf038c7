//! Terminal presentation of search sessions.
//!
//! Everything here only reads [`SearchState`] snapshots and models; no
//! function in this module changes a session.

use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::time::Duration;

use crate::models::Book;
use crate::search::{BookDetail, SearchState, TRENDING_SEARCHES};
use crate::utils::{
    book_table_columns, truncate_at_word, truncate_with_ellipsis, wrap_text, CoverResolver,
    CoverSize,
};

/// Rows used by one book in the browse list
pub const CARD_HEIGHT: u32 = 3;

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Info => "ℹ",
        Status::Search => "🔍",
    }
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
    Search,
}

/// Print a styled status message.
pub fn print_status(status: Status, msg: &str) {
    let icon = status_icon(status);
    match status {
        Status::Success => println!("{} {}", icon.green().bold(), msg),
        Status::Error => println!("{} {}", icon.red().bold(), msg.red()),
        Status::Warning => println!("{} {}", icon.yellow().bold(), msg.yellow()),
        Status::Info => println!("{} {}", icon.cyan().bold(), msg),
        Status::Search => println!("{} {}", icon.yellow(), msg),
    }
}

/// Welcome banner for the application.
pub fn print_banner() {
    println!();
    println!("{}", "📚 BookFinder".bold().blue());
    println!("{}", "Discover your next favorite read".dimmed());
    println!();
}

/// Print a section header.
pub fn print_section(title: &str) {
    println!();
    println!("{}", format!("━━━ {} ━━━", title).bold().cyan());
}

/// Print the trending searches as a numbered list.
pub fn print_trending() {
    print_section("Trending Searches");
    for (i, title) in TRENDING_SEARCHES.iter().enumerate() {
        println!("  {:>2}. {}", (i + 1).dimmed(), title);
    }
}

/// One-line status summary of a snapshot, `None` when idle.
pub fn state_summary(state: &SearchState) -> Option<String> {
    if state.loading {
        return Some("Searching books...".to_string());
    }
    if let Some(error) = &state.error {
        return Some(error.clone());
    }
    let query = state.query.as_ref()?;
    if state.results.is_empty() {
        return Some(format!("No books found for \"{}\"", query));
    }

    let more = if state.has_more {
        ", more available"
    } else {
        ""
    };
    Some(format!(
        "{} books for \"{}\" (page {}{})",
        state.results.len(),
        query,
        state.page,
        more
    ))
}

/// The [`CARD_HEIGHT`] lines that represent one book in a list.
pub fn card_lines(book: &Book, index: usize, width: usize) -> [String; CARD_HEIGHT as usize] {
    let text_width = width.saturating_sub(6).max(20);

    let mut meta = format!("Published: {}", book.published_display());
    if let Some(editions) = book.editions_label() {
        meta.push_str(" · ");
        meta.push_str(&editions);
    }

    [
        format!(
            "{:>4}. {}",
            index + 1,
            truncate_at_word(book.title_or_default(), text_width)
        ),
        format!(
            "      {}",
            truncate_with_ellipsis(&book.authors_display(), text_width)
        ),
        format!("      {}", meta),
    ]
}

/// All list lines for a snapshot, in result order.
pub fn result_lines(state: &SearchState, width: usize) -> Vec<String> {
    state
        .results
        .iter()
        .enumerate()
        .flat_map(|(i, book)| card_lines(book, i, width))
        .collect()
}

/// Result table for one-shot searches.
pub fn results_table(books: &[Book], first_index: usize, width: usize) -> Table {
    let (title_width, authors_width, _) = book_table_columns(width);

    let mut table = Table::new();
    table
        .load_preset(comfy_table::presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(width as u16)
        .set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Authors").add_attribute(Attribute::Bold),
            Cell::new("Year").add_attribute(Attribute::Bold),
            Cell::new("Key").add_attribute(Attribute::Bold),
        ]);

    for (i, book) in books.iter().enumerate() {
        table.add_row(vec![
            Cell::new(first_index + i + 1),
            Cell::new(truncate_at_word(book.title_or_default(), title_width)),
            Cell::new(truncate_with_ellipsis(&book.authors_display(), authors_width)),
            Cell::new(book.published_display()),
            Cell::new(&book.key),
        ]);
    }

    table
}

/// Tab-separated lines for piping.
pub fn plain_lines(books: &[Book], covers: &CoverResolver) -> Vec<String> {
    books
        .iter()
        .map(|book| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                book.key,
                book.title_or_default(),
                book.authors_display(),
                book.published_display(),
                covers.resolve(book.cover_id, CoverSize::Medium)
            )
        })
        .collect()
}

/// Lines of the detail view.
pub fn detail_lines(detail: &BookDetail, width: usize) -> Vec<String> {
    let book = &detail.book;
    let mut lines = vec![
        book.title_or_default().to_string(),
        format!("by {}", book.authors_display()),
        String::new(),
        format!("Published: {}", book.published_display()),
    ];

    if let Some(publishers) = book.publishers_display() {
        lines.push(format!(
            "Publisher: {}",
            truncate_with_ellipsis(&publishers, width.saturating_sub(11))
        ));
    }
    if let Some(isbn) = book.primary_isbn() {
        lines.push(format!("ISBN: {}", isbn));
    }
    if let Some(editions) = book.editions_label() {
        lines.push(format!("Editions: {}", editions));
    }
    lines.push(format!("Cover: {}", detail.cover));

    if let Some(description) = &detail.description {
        lines.push(String::new());
        lines.push("Description".to_string());
        lines.extend(wrap_text(description, width));
    }

    let subjects = book.top_subjects();
    if !subjects.is_empty() {
        lines.push(String::new());
        lines.push("Subjects".to_string());
        lines.extend(wrap_text(&subjects.join(" · "), width));
    }

    lines
}

/// Print the detail view with headings highlighted.
pub fn print_detail(detail: &BookDetail, width: usize) {
    print_section("Book Details");
    for (i, line) in detail_lines(detail, width).into_iter().enumerate() {
        match line.as_str() {
            _ if i == 0 => println!("{}", line.bold().blue()),
            "Description" | "Subjects" => println!("{}", line.bold()),
            _ => println!("{}", line),
        }
    }
}

/// Loading spinner shown while a fetch is in flight.
pub struct Spinner {
    pb: indicatif::ProgressBar,
}

impl Spinner {
    /// Create a new spinner with the given message.
    pub fn new(msg: &str) -> Self {
        let pb = indicatif::ProgressBar::new_spinner();
        if let Ok(style) =
            indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg}")
        {
            pb.set_style(style.tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "));
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    /// Hidden spinner for non-interactive output
    pub fn hidden() -> Self {
        Self {
            pb: indicatif::ProgressBar::hidden(),
        }
    }

    /// Spinner that only draws when `show` is set and stderr is a terminal
    pub fn when(show: bool, msg: &str) -> Self {
        if show && std::io::stderr().is_terminal() {
            Self::new(msg)
        } else {
            Self::hidden()
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.pb.is_hidden()
    }

    /// Remove the spinner from the terminal.
    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::make_book;
    use crate::search::FETCH_FAILED_MESSAGE;
    use crate::utils::CoverImage;

    #[test]
    fn test_spinner_disabled_stays_hidden() {
        let spinner = Spinner::when(false, "Searching books...");
        assert!(spinner.is_hidden());
        spinner.finish();
        assert!(Spinner::hidden().is_hidden());
    }

    #[test]
    fn test_status_icon() {
        assert_eq!(status_icon(Status::Success), "✓");
        assert_eq!(status_icon(Status::Error), "✗");
        assert_eq!(status_icon(Status::Search), "🔍");
    }

    #[test]
    fn test_state_summary() {
        assert_eq!(state_summary(&SearchState::default()), None);

        let loading = SearchState {
            loading: true,
            ..Default::default()
        };
        assert_eq!(state_summary(&loading).as_deref(), Some("Searching books..."));

        let failed = SearchState {
            error: Some(FETCH_FAILED_MESSAGE.to_string()),
            ..Default::default()
        };
        assert_eq!(state_summary(&failed).as_deref(), Some(FETCH_FAILED_MESSAGE));

        let empty = SearchState {
            query: Some("zzz".to_string()),
            ..Default::default()
        };
        assert_eq!(
            state_summary(&empty).as_deref(),
            Some("No books found for \"zzz\"")
        );

        let loaded = SearchState {
            query: Some("dune".to_string()),
            results: vec![make_book("/works/OL1W", "Dune")],
            has_more: true,
            ..Default::default()
        };
        assert_eq!(
            state_summary(&loaded).as_deref(),
            Some("1 books for \"dune\" (page 1, more available)")
        );
    }

    #[test]
    fn test_result_lines_height() {
        let state = SearchState {
            query: Some("x".to_string()),
            results: vec![make_book("/works/A", "A"), make_book("/works/B", "B")],
            ..Default::default()
        };
        let lines = result_lines(&state, 80);
        assert_eq!(lines.len(), 2 * CARD_HEIGHT as usize);
        assert_eq!(lines[0], "   1. A");
        assert_eq!(lines[3], "   2. B");
        assert_eq!(lines[1].trim(), "Unknown Author");
    }

    #[test]
    fn test_detail_lines_without_description() {
        let detail = BookDetail {
            book: make_book("/works/OL1W", "Untold"),
            cover: CoverImage::Placeholder,
            description: None,
        };
        let lines = detail_lines(&detail, 60);
        assert_eq!(lines[0], "Untold");
        assert!(lines.iter().all(|l| l != "Description"));
        assert!(lines.contains(&"Cover: /book-placeholder.png".to_string()));
    }

    #[test]
    fn test_plain_lines() {
        let mut book = make_book("/works/OL1W", "Dune");
        book.cover_id = Some(5);
        let lines = plain_lines(&[book], &CoverResolver::default());
        assert_eq!(
            lines[0],
            "/works/OL1W\tDune\tUnknown Author\tUnknown\thttps://covers.openlibrary.org/b/id/5-M.jpg"
        );
    }

    #[test]
    fn test_results_table_has_row_per_book() {
        let books = vec![make_book("/works/A", "A"), make_book("/works/B", "B")];
        let table = results_table(&books, 20, 100);
        assert_eq!(table.row_iter().count(), 2);
        assert!(table.to_string().contains("21"));
    }
}
