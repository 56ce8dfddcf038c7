//! Open Library catalog implementation.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::catalog::{Catalog, CatalogError};
use crate::models::{SearchPage, TitleQuery, WorkDetails};
use crate::utils::HttpClient;

/// Public Open Library API root
pub const OPEN_LIBRARY_BASE_URL: &str = "https://openlibrary.org";

/// Open Library catalog
///
/// Uses the `search.json` endpoint for title search and `{key}.json` for work
/// records.
#[derive(Debug, Clone)]
pub struct OpenLibraryCatalog {
    client: HttpClient,
    base_url: String,
}

impl OpenLibraryCatalog {
    /// Create a catalog client against the public API
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, OPEN_LIBRARY_BASE_URL)
    }

    /// Create a catalog client against a different API root
    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// API root this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the title search URL
    fn search_url(&self, query: &TitleQuery) -> String {
        format!(
            "{}/search.json?title={}&page={}&limit={}",
            self.base_url,
            urlencoding::encode(&query.title),
            query.page,
            query.limit
        )
    }

    /// Build the work record URL. Keys are expected as `/works/OL..W`, but a
    /// bare `works/OL..W` is accepted too.
    fn details_url(&self, key: &str) -> String {
        let key = key.trim();
        if key.starts_with('/') {
            format!("{}{}.json", self.base_url, key)
        } else {
            format!("{}/{}.json", self.base_url, key)
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, CatalogError> {
        debug!("GET {}", url);

        let response = self.client.client().get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl Catalog for OpenLibraryCatalog {
    fn name(&self) -> &str {
        "Open Library"
    }

    async fn search_by_title(&self, query: &TitleQuery) -> Result<SearchPage, CatalogError> {
        if query.is_blank() {
            return Err(CatalogError::InvalidRequest(
                "title must not be empty".to_string(),
            ));
        }

        let url = self.search_url(query);
        let page: SearchPage = self.get_json(&url).await?;
        debug!(
            title = %query.title,
            page = query.page,
            returned = page.items.len(),
            "Open Library search completed"
        );
        Ok(page)
    }

    async fn get_details(&self, key: &str) -> Result<WorkDetails, CatalogError> {
        if key.trim().is_empty() {
            return Err(CatalogError::InvalidRequest(
                "book key must not be empty".to_string(),
            ));
        }

        let url = self.details_url(key);
        self.get_json(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> OpenLibraryCatalog {
        OpenLibraryCatalog::with_base_url(HttpClient::new().unwrap(), "https://openlibrary.org/")
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        assert_eq!(catalog().base_url(), "https://openlibrary.org");
    }

    #[test]
    fn test_search_url_encodes_title() {
        let url = catalog().search_url(&TitleQuery::new("Harry Potter & co").page(2).limit(20));
        assert_eq!(
            url,
            "https://openlibrary.org/search.json?title=Harry%20Potter%20%26%20co&page=2&limit=20"
        );
    }

    #[test]
    fn test_details_url_normalizes_key() {
        let c = catalog();
        assert_eq!(
            c.details_url("/works/OL82563W"),
            "https://openlibrary.org/works/OL82563W.json"
        );
        assert_eq!(
            c.details_url("works/OL82563W"),
            "https://openlibrary.org/works/OL82563W.json"
        );
    }

    #[tokio::test]
    async fn test_blank_title_rejected_without_request() {
        let result = catalog().search_by_title(&TitleQuery::new("  ")).await;
        assert!(matches!(result, Err(CatalogError::InvalidRequest(_))));
    }
}
