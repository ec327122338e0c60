//! Search projection over the ordered list
//!
//! Filtering is a view: it borrows from `items` and never reorders or
//! renumbers them.

use shared::Searchable;

/// Lowercased search needle; whitespace is part of the match
pub fn normalize_search(term: &str) -> String {
    term.to_lowercase()
}

/// Items matching `needle` in list order
pub fn visible<'a, T: Searchable>(items: &'a [T], needle: &str) -> Vec<&'a T> {
    items.iter().filter(|item| item.matches_search(needle)).collect()
}
