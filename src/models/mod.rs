//! Core data models for books and search operations.

mod book;
mod search;

pub use book::{Book, Description, WorkDetails, MAX_SUBJECTS, UNKNOWN_AUTHOR, UNKNOWN_YEAR};
pub use search::{SearchPage, TitleQuery, DEFAULT_PAGE_SIZE};
