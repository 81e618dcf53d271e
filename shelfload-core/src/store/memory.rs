//! In-memory record store.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use crate::{Author, Book};

use super::{AuthorStore, BookStore, StoreError};

/// Record store holding authors and books in ordered maps.
///
/// Intended for tests and small embedded runs; nothing is persisted beyond
/// the lifetime of the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    authors: RwLock<BTreeMap<String, Author>>,
    books: RwLock<BTreeMap<String, Book>>,
}

impl MemoryStore {
    /// Create a store pre-populated with `authors`.
    pub fn with_authors<I>(authors: I) -> Self
    where
        I: IntoIterator<Item = Author>,
    {
        let authors = authors
            .into_iter()
            .map(|author| (author.id.clone(), author))
            .collect();
        Self {
            authors: RwLock::new(authors),
            books: RwLock::default(),
        }
    }

    /// Number of stored authors.
    pub fn author_count(&self) -> Result<usize, StoreError> {
        Ok(self.authors.read().map_err(poisoned)?.len())
    }

    /// Number of stored books.
    pub fn book_count(&self) -> Result<usize, StoreError> {
        Ok(self.books.read().map_err(poisoned)?.len())
    }
}

fn poisoned<T>(_: PoisonError<T>) -> StoreError {
    StoreError::Poisoned
}

impl AuthorStore for MemoryStore {
    fn get_author(&self, id: &str) -> Result<Option<Author>, StoreError> {
        Ok(self.authors.read().map_err(poisoned)?.get(id).cloned())
    }

    fn put_author(&self, author: &Author) -> Result<(), StoreError> {
        self.authors
            .write()
            .map_err(poisoned)?
            .insert(author.id.clone(), author.clone());
        Ok(())
    }
}

impl BookStore for MemoryStore {
    fn get_book(&self, id: &str) -> Result<Option<Book>, StoreError> {
        Ok(self.books.read().map_err(poisoned)?.get(id).cloned())
    }

    fn put_book(&self, book: &Book) -> Result<(), StoreError> {
        self.books
            .write()
            .map_err(poisoned)?
            .insert(book.id.clone(), book.clone());
        Ok(())
    }
}
