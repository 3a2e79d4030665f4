//! Contact operations on a loaded phone book.

use crate::codec::PhoneBook;
use crate::error::PhonevaultError;

/// What `add` did to the book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// The name was new.
    Added,
    /// The name existed; its previous number was replaced.
    Replaced { previous: String },
}

/// A single search hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact<'a> {
    pub name: &'a str,
    pub number: &'a str,
}

/// The result of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome<'a> {
    /// The book has no contacts at all.
    EmptyBook,
    /// The book has contacts, none of which matched.
    NoHits,
    /// Matching contacts in name order.
    Hits(Vec<Contact<'a>>),
}

impl<'a> SearchOutcome<'a> {
    /// The matching contacts, empty unless this is `Hits`.
    pub fn hits(&self) -> &[Contact<'a>] {
        match self {
            Self::Hits(hits) => hits,
            Self::EmptyBook | Self::NoHits => &[],
        }
    }
}

/// Insert or overwrite the number for `name`.
pub fn add(book: &mut PhoneBook, name: &str, number: &str) -> Result<AddOutcome, PhonevaultError> {
    let outcome = match book.insert(name, number)? {
        Some(previous) => AddOutcome::Replaced { previous },
        None => AddOutcome::Added,
    };
    tracing::debug!(
        contacts = book.len(),
        replaced = matches!(outcome, AddOutcome::Replaced { .. }),
        "contact added"
    );
    Ok(outcome)
}

/// Find every contact whose name contains `query`. Case-sensitive.
pub fn search<'a>(book: &'a PhoneBook, query: &str) -> SearchOutcome<'a> {
    if book.is_empty() {
        return SearchOutcome::EmptyBook;
    }
    let hits: Vec<_> = book
        .iter()
        .filter(|(name, _)| name.contains(query))
        .map(|(name, number)| Contact { name, number })
        .collect();
    if hits.is_empty() {
        SearchOutcome::NoHits
    } else {
        SearchOutcome::Hits(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice_and_bob() -> PhoneBook {
        let mut book = PhoneBook::new();
        add(&mut book, "Alice", "111").unwrap();
        add(&mut book, "Bob", "222").unwrap();
        book
    }

    #[test]
    fn test_add_overwrites() {
        let mut book = PhoneBook::new();
        assert_eq!(add(&mut book, "Alice", "111").unwrap(), AddOutcome::Added);
        assert_eq!(
            add(&mut book, "Alice", "222").unwrap(),
            AddOutcome::Replaced { previous: "111".into() }
        );
        assert_eq!(book.len(), 1);
        assert_eq!(book.get("Alice"), Some("222"));
    }

    #[test]
    fn test_search_substring() {
        let book = alice_and_bob();
        let result = search(&book, "li");
        assert_eq!(result.hits(), [Contact { name: "Alice", number: "111" }]);
    }

    #[test]
    fn test_search_is_case_sensitive() {
        let book = alice_and_bob();
        assert_eq!(search(&book, "alice"), SearchOutcome::NoHits);
        assert_eq!(search(&book, "B").hits().len(), 1);
    }

    #[test]
    fn test_no_hits_distinct_from_empty_book() {
        let book = alice_and_bob();
        let result = search(&book, "Zz");
        assert_eq!(result, SearchOutcome::NoHits);
        assert!(result.hits().is_empty());
        assert_eq!(search(&PhoneBook::new(), "Zz"), SearchOutcome::EmptyBook);
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let book = alice_and_bob();
        let names: Vec<_> = search(&book, "").hits().iter().map(|c| c.name).collect();
        assert_eq!(names, ["Alice", "Bob"]);
    }
}
