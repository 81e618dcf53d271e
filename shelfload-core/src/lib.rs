//! Catalogue model and record store interfaces for shelfload.
//!
//! The crate holds the two entities produced by dump ingestion, [`Author`]
//! and [`Book`], together with the key-value store traits the loader writes
//! through. Stores are keyed by the entity's string identifier and follow
//! upsert semantics: writing an id that already exists replaces the stored
//! record.
#![forbid(unsafe_code)]

mod author;
mod book;
pub mod store;

pub use author::Author;
pub use book::{Book, UNKNOWN_AUTHOR};
pub use store::{AuthorStore, BookStore, MemoryStore, StoreError};

#[cfg(feature = "store-sqlite")]
pub use store::SqliteStore;
