//! Basic usage example for the Book Finder library.
//!
//! This example searches Open Library by title, loads a second page and
//! shows the details of the first result.

use book_finder::catalog::OpenLibraryCatalog;
use book_finder::search::{load_detail, SearchSession};
use book_finder::utils::{CoverResolver, HttpClient};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Arc::new(OpenLibraryCatalog::new(HttpClient::new()?));
    let session = SearchSession::new(catalog.clone(), 20);

    println!("Searching \"The Hobbit\"...");
    session.start_search("The Hobbit").await;

    let state = session.state();
    if let Some(error) = &state.error {
        eprintln!("  Error: {}", error);
        return Ok(());
    }
    println!("  Found {} books on page {}", state.results.len(), state.page);

    // Continue only while a full page suggests there is more
    if state.has_more {
        session.load_more().await;
        let state = session.state();
        println!("  {} books after page {}", state.results.len(), state.page);
    }

    let state = session.state();
    for (i, book) in state.results.iter().take(3).enumerate() {
        println!("\n{}. {}", i + 1, book.title_or_default());
        println!("   Authors: {}", book.authors_display());
        println!("   Published: {}", book.published_display());
        println!("   Key: {}", book.key);
    }

    if let Some(first) = state.results.first() {
        let detail = load_detail(catalog.as_ref(), first, &CoverResolver::default()).await;
        println!("\nCover: {}", detail.cover);
        match &detail.description {
            Some(text) => println!("Description: {}", text),
            None => println!("No description available"),
        }
    }

    Ok(())
}
