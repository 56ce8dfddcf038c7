//! Expanded view of a single book.

use serde::Serialize;
use tracing::warn;

use crate::catalog::Catalog;
use crate::models::{Book, WorkDetails};
use crate::utils::{CoverImage, CoverResolver, CoverSize};

/// Everything the detail view shows for one book
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookDetail {
    /// The search document the detail was opened from
    pub book: Book,

    /// Large cover image
    #[serde(serialize_with = "serialize_cover")]
    pub cover: CoverImage,

    /// Work description, absent when the work has none or the lookup failed
    pub description: Option<String>,
}

impl BookDetail {
    /// Detail view for a work looked up by key, without a search result
    pub fn from_work(key: &str, work: &WorkDetails, covers: &CoverResolver) -> Self {
        Self {
            book: Book {
                key: key.to_string(),
                title: work.title.clone(),
                ..Default::default()
            },
            cover: covers.resolve(work.cover_id(), CoverSize::Large),
            description: work.description_text().map(str::to_string),
        }
    }
}

/// Message shown when a work record cannot be fetched
pub const DETAILS_FAILED_MESSAGE: &str = "Failed to fetch book details. Please try again.";

/// Fetch the work record for `key`.
///
/// Failures are logged with their cause and collapse to `None`; callers show
/// [`DETAILS_FAILED_MESSAGE`].
pub async fn fetch_work<C: Catalog + ?Sized>(catalog: &C, key: &str) -> Option<WorkDetails> {
    match catalog.get_details(key).await {
        Ok(work) => Some(work),
        Err(e) => {
            warn!(%key, error = %e, "Failed to fetch book details");
            None
        }
    }
}

fn serialize_cover<S: serde::Serializer>(cover: &CoverImage, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&cover.to_string())
}

/// Build the detail view for `book`.
///
/// The work record is only used for its description. A failed lookup is
/// logged and the view is still returned with the fields already known from
/// the search result.
pub async fn load_detail<C: Catalog + ?Sized>(
    catalog: &C,
    book: &Book,
    covers: &CoverResolver,
) -> BookDetail {
    let description = match catalog.get_details(&book.key).await {
        Ok(details) => details.description_text().map(str::to_string),
        Err(e) => {
            warn!(key = %book.key, error = %e, "Failed to fetch book details");
            None
        }
    };

    BookDetail {
        book: book.clone(),
        cover: covers.resolve(book.cover_id, CoverSize::Large),
        description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{make_book, CatalogError, MockCatalog};
    use crate::models::Description;

    #[tokio::test]
    async fn test_detail_with_description() {
        let catalog = MockCatalog::new();
        catalog.set_details(
            "/works/OL27448W",
            Ok(WorkDetails {
                description: Some(Description::Typed {
                    kind: Some("/type/text".to_string()),
                    value: "There and back again.".to_string(),
                }),
                ..Default::default()
            }),
        );
        let mut book = make_book("/works/OL27448W", "The Hobbit");
        book.cover_id = Some(14627509);

        let detail = load_detail(&catalog, &book, &CoverResolver::default()).await;
        assert_eq!(detail.description.as_deref(), Some("There and back again."));
        assert_eq!(
            detail.cover.url(),
            Some("https://covers.openlibrary.org/b/id/14627509-L.jpg")
        );
    }

    #[tokio::test]
    async fn test_detail_failure_keeps_known_fields() {
        let catalog = MockCatalog::new();
        catalog.set_details(
            "/works/OL1W",
            Err(CatalogError::Status {
                status: 500,
                url: "mock://works/OL1W".to_string(),
            }),
        );
        let book = make_book("/works/OL1W", "Known Title");

        let detail = load_detail(&catalog, &book, &CoverResolver::default()).await;
        assert!(detail.description.is_none());
        assert_eq!(detail.book.title.as_deref(), Some("Known Title"));
        assert!(detail.cover.is_placeholder());
    }

    #[tokio::test]
    async fn test_fetch_work_failure_is_none() {
        let catalog = MockCatalog::new();
        catalog.set_details(
            "/works/OL2W",
            Err(CatalogError::Status {
                status: 503,
                url: "http://127.0.0.1/works/OL2W.json".to_string(),
            }),
        );

        assert_eq!(fetch_work(&catalog, "/works/OL2W").await, None);
        // Unscripted keys answer 404
        assert_eq!(fetch_work(&catalog, "/works/OL3W").await, None);
    }

    #[test]
    fn test_detail_from_work_uses_work_cover() {
        let work = WorkDetails {
            title: Some("Dune".to_string()),
            description: Some(Description::Text("Spice.".to_string())),
            covers: Some(vec![-1, 11481354]),
            ..Default::default()
        };

        let detail = BookDetail::from_work("/works/OL893415W", &work, &CoverResolver::default());
        assert_eq!(detail.book.key, "/works/OL893415W");
        assert_eq!(detail.book.title.as_deref(), Some("Dune"));
        assert_eq!(detail.description.as_deref(), Some("Spice."));
        assert_eq!(
            detail.cover.url(),
            Some("https://covers.openlibrary.org/b/id/11481354-L.jpg")
        );

        let bare = BookDetail::from_work(
            "/works/OL1W",
            &WorkDetails::default(),
            &CoverResolver::default(),
        );
        assert!(bare.cover.is_placeholder());
    }
}
