//! Facade crate for the shelfload dump loader.
//!
//! This crate re-exports the catalogue model, the record store traits and the
//! ingestion pipeline. The SQLite store is available behind the
//! `store-sqlite` feature.

#![forbid(unsafe_code)]

pub use shelfload_core::{
    Author, AuthorStore, Book, BookStore, MemoryStore, StoreError, UNKNOWN_AUTHOR,
};
pub use shelfload_data::{
    DEFAULT_WORK_LIMIT, ExtractBookError, FailureKind, LineError, LoadError, Loader, LoaderConfig,
    Pass, PassReport, RecordError, RunReport, SkippedLine, SourceUnavailable, extract_author,
    extract_book, open_dump,
};

#[cfg(feature = "store-sqlite")]
pub use shelfload_core::SqliteStore;
