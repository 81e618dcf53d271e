//! Dump ingestion for the shelfload catalogue.
//!
//! Responsibilities:
//! - Stream raw lines from Open Library style dump files.
//! - Turn one tagged JSON line into an [`Author`] or [`Book`].
//! - Drive the author and work passes and persist through the record store
//!   traits from `shelfload-core`.
//!
//! Boundaries:
//! - Storage lives behind [`AuthorStore`] and [`BookStore`]; nothing here
//!   knows about SQLite.
//! - Processing is sequential. One line is read, extracted and persisted
//!   before the next is read.
//!
//! Invariants:
//! - No global mutable state; paths and caps arrive in a [`LoaderConfig`].
//! - A bad line never aborts a pass, whether it is malformed or its record
//!   could not be stored. Only failures of the dump file itself do.
//!
//! [`Author`]: shelfload_core::Author
//! [`Book`]: shelfload_core::Book
//! [`AuthorStore`]: shelfload_core::AuthorStore
//! [`BookStore`]: shelfload_core::BookStore
#![forbid(unsafe_code)]

pub mod dump;
pub mod extract;
pub mod load;

pub use dump::{DumpLine, DumpLines, ReadLineError, SourceUnavailable, open_dump};
pub use extract::{
    AUTHOR_KEY_PREFIX, ExtractBookError, FailureKind, PUBLISHED_TIMESTAMP_FORMAT, RecordError,
    WORK_KEY_PREFIX, extract_author, extract_book,
};
pub use load::{
    DEFAULT_WORK_LIMIT, LineError, LoadError, Loader, LoaderConfig, Pass, PassReport, RunReport,
    SkippedLine,
};
