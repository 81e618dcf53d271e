use chrono::NaiveDate;

/// Placeholder recorded in [`Book::author_names`] when an author id has no
/// matching record in the author store.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// A creative work together with a snapshot of its authors' names.
///
/// `author_names` is denormalised at load time: entry `i` is the name of the
/// author whose id is `author_ids[i]`, or [`UNKNOWN_AUTHOR`]. Both vectors
/// always have the same length.
///
/// # Examples
/// ```
/// use shelfload_core::{Book, UNKNOWN_AUTHOR};
///
/// let mut book = Book::new("OL1W", "Test Book");
/// book.author_ids = vec!["OL1A".into(), "OL404A".into()];
/// book.author_names = vec!["Jane Doe".into(), UNKNOWN_AUTHOR.into()];
///
/// assert_eq!(book.authors().count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Book {
    /// Open Library work key without the `/works/` prefix.
    pub id: String,
    /// Title of the work; empty when the dump omits it.
    pub name: String,
    /// Free-text description; empty when the dump omits it.
    pub description: String,
    /// Date the work record was created, if the dump carried one.
    pub published_date: Option<NaiveDate>,
    /// Cover image identifiers in dump order.
    pub cover_ids: Vec<String>,
    /// Referenced author ids in dump order.
    pub author_ids: Vec<String>,
    /// Resolved author names, index-aligned with `author_ids`.
    pub author_names: Vec<String>,
}

impl Book {
    /// Create a book with the given id and title and no optional details.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Iterate over `(author_id, author_name)` pairs.
    pub fn authors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.author_ids
            .iter()
            .zip(&self.author_names)
            .map(|(id, name)| (id.as_str(), name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn new_book_has_no_optional_details() {
        let book = Book::new("OL1W", "Test Book");
        assert!(book.description.is_empty());
        assert_eq!(book.published_date, None);
        assert!(book.cover_ids.is_empty());
        assert!(book.author_ids.is_empty());
        assert!(book.author_names.is_empty());
    }

    #[rstest]
    fn authors_pairs_ids_with_names() {
        let mut book = Book::new("OL1W", "Test Book");
        book.author_ids = vec!["OL1A".into(), "OL2A".into()];
        book.author_names = vec!["Jane Doe".into(), UNKNOWN_AUTHOR.into()];

        let pairs: Vec<_> = book.authors().collect();
        assert_eq!(pairs, vec![("OL1A", "Jane Doe"), ("OL2A", UNKNOWN_AUTHOR)]);
    }
}
