//! Key-value persistence for catalogue records.
//!
//! The loader talks to storage only through [`AuthorStore`] and
//! [`BookStore`]. Both are keyed by the record's string id and use upsert
//! semantics. Methods take `&self` so one handle can serve as the author
//! lookup and the book sink within the same pass; implementations provide
//! their own interior synchronisation.

use std::error::Error as StdError;

use thiserror::Error;

use crate::{Author, Book};

mod memory;
#[cfg(feature = "store-sqlite")]
mod schema;
#[cfg(feature = "store-sqlite")]
mod sqlite;

pub use memory::MemoryStore;
#[cfg(feature = "store-sqlite")]
pub use schema::SCHEMA_VERSION;
#[cfg(feature = "store-sqlite")]
pub use sqlite::SqliteStore;

/// Persistence for [`Author`] records.
///
/// # Examples
///
/// ```rust
/// use shelfload_core::{Author, AuthorStore, MemoryStore};
///
/// # fn main() -> Result<(), shelfload_core::StoreError> {
/// let store = MemoryStore::default();
/// store.put_author(&Author::new("OL1A", "Jane Doe", ""))?;
/// store.put_author(&Author::new("OL1A", "Jane Q. Doe", ""))?;
///
/// let stored = store.get_author("OL1A")?.map(|author| author.name);
/// assert_eq!(stored.as_deref(), Some("Jane Q. Doe"));
/// # Ok(())
/// # }
/// ```
pub trait AuthorStore {
    /// Fetch the author stored under `id`, if any.
    fn get_author(&self, id: &str) -> Result<Option<Author>, StoreError>;

    /// Insert `author`, replacing any record with the same id.
    fn put_author(&self, author: &Author) -> Result<(), StoreError>;
}

/// Persistence for [`Book`] records.
pub trait BookStore {
    /// Fetch the book stored under `id`, if any.
    fn get_book(&self, id: &str) -> Result<Option<Book>, StoreError>;

    /// Insert `book`, replacing any record with the same id.
    fn put_book(&self, book: &Book) -> Result<(), StoreError>;
}

/// Errors raised by record store implementations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// Another user of an in-memory store panicked while holding its lock.
    #[error("in-memory store lock was poisoned")]
    Poisoned,
    /// Creating the directory for the database file failed.
    #[cfg(feature = "store-sqlite")]
    #[error("failed to create parent directory for {path:?}")]
    CreateDirectory {
        /// Database path whose parent could not be created.
        path: camino::Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the SQLite database failed.
    #[cfg(feature = "store-sqlite")]
    #[error("failed to open SQLite database at {path:?}")]
    Open {
        /// Database path.
        path: camino::Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// A schema step or statement failed.
    #[cfg(feature = "store-sqlite")]
    #[error("failed to {operation}")]
    Sqlite {
        /// Short description of the failed operation.
        operation: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// The database was created by an incompatible schema version.
    #[cfg(feature = "store-sqlite")]
    #[error("expected shelfload schema version {expected} but found {found}")]
    VersionMismatch {
        /// Version this build writes.
        expected: i64,
        /// Version recorded in the database.
        found: i64,
    },
    /// A column value could not be encoded for storage.
    #[cfg(feature = "store-sqlite")]
    #[error("failed to encode {field} for record {id}")]
    Encode {
        /// Record identifier.
        id: String,
        /// Column being encoded.
        field: &'static str,
        /// Serialisation failure.
        #[source]
        source: serde_json::Error,
    },
    /// A stored column value could not be decoded.
    #[error("stored {field} for record {id} is corrupt")]
    Decode {
        /// Record identifier.
        id: String,
        /// Column being decoded.
        field: &'static str,
        /// Underlying decoding failure.
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}
