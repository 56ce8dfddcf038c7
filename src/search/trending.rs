//! Suggested searches shown before the first query.

/// Popular titles offered as one-click searches
pub const TRENDING_SEARCHES: [&str; 10] = [
    "Harry Potter",
    "Sherlock Holmes",
    "The Lord of the Rings",
    "Pride and Prejudice",
    "The Great Gatsby",
    "To Kill a Mockingbird",
    "1984",
    "The Hobbit",
    "The Catcher in the Rye",
    "The Alchemist",
];
