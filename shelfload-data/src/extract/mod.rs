//! Per-line extraction of catalogue records.
//!
//! Both extractors strip the non-JSON tag in front of the first `{`, parse the
//! remainder and map fields onto the core model. Author extraction is lenient:
//! apart from a usable `key`, every field falls back to an empty string. Book
//! extraction is strict about `key`, `created.value` and each
//! `authors[i].author.key`, and rejects the whole line when one of them is
//! missing or malformed.

mod author;
mod book;
mod error;
mod fields;

pub use author::{AUTHOR_KEY_PREFIX, extract_author};
pub use book::{ExtractBookError, PUBLISHED_TIMESTAMP_FORMAT, WORK_KEY_PREFIX, extract_book};
pub use error::{FailureKind, RecordError};
