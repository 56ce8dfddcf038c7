//! Book model representing a single Open Library search document.

use serde::{Deserialize, Serialize};

/// Fallback shown when a document carries no author list
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Fallback shown when a document carries no first-publish year
pub const UNKNOWN_YEAR: &str = "Unknown";

/// Maximum number of subjects shown in the detail view
pub const MAX_SUBJECTS: usize = 10;

/// A book as returned by the catalog search endpoint.
///
/// Only `key` is guaranteed; every other field is optional because the
/// catalog omits fields it has no data for. Field names follow the catalog's
/// JSON document so a `Book` round-trips through `serde_json` unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Stable catalog key, e.g. `/works/OL82563W`
    pub key: String,

    /// Title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Author names
    #[serde(
        default,
        rename = "author_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub authors: Option<Vec<String>>,

    /// Year of the first known publication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_publish_year: Option<i32>,

    /// Numeric cover identifier
    #[serde(default, rename = "cover_i", skip_serializing_if = "Option::is_none")]
    pub cover_id: Option<u64>,

    /// Number of editions of this work
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edition_count: Option<u32>,

    /// Subjects
    #[serde(default, rename = "subject", skip_serializing_if = "Option::is_none")]
    pub subjects: Option<Vec<String>>,

    /// ISBNs of all editions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<Vec<String>>,

    /// Publishers of all editions
    #[serde(default, rename = "publisher", skip_serializing_if = "Option::is_none")]
    pub publishers: Option<Vec<String>>,
}

impl Book {
    /// Create a book with only its key set
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    /// Identity used when rendering a result list.
    ///
    /// The catalog can return the same key on more than one page, so the
    /// position in the list is part of the identity.
    pub fn display_id(&self, index: usize) -> String {
        format!("{}-{}", self.key, index)
    }

    /// Title, or an empty string when the catalog has none
    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Comma-separated author names, or [`UNKNOWN_AUTHOR`]
    pub fn authors_display(&self) -> String {
        match &self.authors {
            Some(names) if !names.is_empty() => names.join(", "),
            _ => UNKNOWN_AUTHOR.to_string(),
        }
    }

    /// First-publish year, or [`UNKNOWN_YEAR`]
    pub fn published_display(&self) -> String {
        self.first_publish_year
            .map(|y| y.to_string())
            .unwrap_or_else(|| UNKNOWN_YEAR.to_string())
    }

    /// "1 edition" / "N editions", or `None` when the count is unknown or zero
    pub fn editions_label(&self) -> Option<String> {
        match self.edition_count {
            Some(0) | None => None,
            Some(1) => Some("1 edition".to_string()),
            Some(n) => Some(format!("{} editions", n)),
        }
    }

    /// Comma-separated publishers
    pub fn publishers_display(&self) -> Option<String> {
        self.publishers
            .as_ref()
            .filter(|p| !p.is_empty())
            .map(|p| p.join(", "))
    }

    /// The first listed ISBN
    pub fn primary_isbn(&self) -> Option<&str> {
        self.isbn.as_ref().and_then(|i| i.first()).map(String::as_str)
    }

    /// Up to [`MAX_SUBJECTS`] subjects
    pub fn top_subjects(&self) -> &[String] {
        match &self.subjects {
            Some(s) => &s[..s.len().min(MAX_SUBJECTS)],
            None => &[],
        }
    }
}

/// Work description as returned by the detail endpoint.
///
/// The catalog uses either a plain string or a typed text object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Description {
    Text(String),
    Typed {
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        kind: Option<String>,
        value: String,
    },
}

impl Description {
    /// The description text regardless of representation
    pub fn text(&self) -> &str {
        match self {
            Description::Text(s) => s,
            Description::Typed { value, .. } => value,
        }
    }
}

/// Subset of the work record returned by the detail endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,

    /// Cover ids attached to the work; removed covers are listed as `-1`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub covers: Option<Vec<i64>>,
}

impl WorkDetails {
    /// First usable cover id
    pub fn cover_id(&self) -> Option<u64> {
        self.covers
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find_map(|&id| u64::try_from(id).ok().filter(|id| *id > 0))
    }

    /// Description text, treating a blank description as absent
    pub fn description_text(&self) -> Option<&str> {
        self.description
            .as_ref()
            .map(Description::text)
            .filter(|t| !t.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_minimal_document() {
        let book: Book = serde_json::from_str(r#"{"key": "/works/OL1W"}"#).unwrap();
        assert_eq!(book.key, "/works/OL1W");
        assert_eq!(book.title_or_default(), "");
        assert_eq!(book.authors_display(), UNKNOWN_AUTHOR);
        assert_eq!(book.published_display(), UNKNOWN_YEAR);
        assert!(book.editions_label().is_none());
        assert!(book.primary_isbn().is_none());
        assert!(book.top_subjects().is_empty());
    }

    #[test]
    fn test_book_full_document() {
        let json = r#"{
            "key": "/works/OL82563W",
            "title": "Harry Potter and the Philosopher's Stone",
            "author_name": ["J. K. Rowling"],
            "first_publish_year": 1997,
            "cover_i": 10521270,
            "edition_count": 1,
            "isbn": ["9780747532699", "0747532699"],
            "publisher": ["Bloomsbury", "Scholastic"],
            "ebook_access": "borrowable"
        }"#;

        let book: Book = serde_json::from_str(json).unwrap();
        assert_eq!(book.cover_id, Some(10521270));
        assert_eq!(book.authors_display(), "J. K. Rowling");
        assert_eq!(book.published_display(), "1997");
        assert_eq!(book.editions_label().as_deref(), Some("1 edition"));
        assert_eq!(book.primary_isbn(), Some("9780747532699"));
        assert_eq!(
            book.publishers_display().as_deref(),
            Some("Bloomsbury, Scholastic")
        );
    }

    #[test]
    fn test_editions_label_plural() {
        let mut book = Book::new("/works/OL1W");
        book.edition_count = Some(42);
        assert_eq!(book.editions_label().as_deref(), Some("42 editions"));
    }

    #[test]
    fn test_top_subjects_capped() {
        let mut book = Book::new("/works/OL1W");
        book.subjects = Some((0..15).map(|i| format!("subject {}", i)).collect());
        assert_eq!(book.top_subjects().len(), MAX_SUBJECTS);
        assert_eq!(book.top_subjects()[0], "subject 0");
    }

    #[test]
    fn test_display_id_includes_position() {
        let book = Book::new("/works/OL1W");
        assert_eq!(book.display_id(0), "/works/OL1W-0");
        assert_ne!(book.display_id(0), book.display_id(20));
    }

    #[test]
    fn test_description_both_shapes() {
        let plain: WorkDetails =
            serde_json::from_str(r#"{"description": "A boy wizard."}"#).unwrap();
        assert_eq!(plain.description_text(), Some("A boy wizard."));

        let typed: WorkDetails = serde_json::from_str(
            r#"{"description": {"type": "/type/text", "value": "A hobbit's tale."}}"#,
        )
        .unwrap();
        assert_eq!(typed.description_text(), Some("A hobbit's tale."));

        let missing: WorkDetails = serde_json::from_str(r#"{"title": "x"}"#).unwrap();
        assert!(missing.description_text().is_none());
    }

    #[test]
    fn test_blank_description_is_absent() {
        let details = WorkDetails {
            description: Some(Description::Text("   ".to_string())),
            ..Default::default()
        };
        assert!(details.description_text().is_none());
    }

    #[test]
    fn test_work_cover_id_skips_removed_covers() {
        let details: WorkDetails =
            serde_json::from_str(r#"{"title": "Dune", "covers": [-1, 11481354, 8739161]}"#)
                .unwrap();
        assert_eq!(details.cover_id(), Some(11481354));

        let none: WorkDetails = serde_json::from_str(r#"{"covers": [-1]}"#).unwrap();
        assert_eq!(none.cover_id(), None);
        assert_eq!(WorkDetails::default().cover_id(), None);
    }
}
