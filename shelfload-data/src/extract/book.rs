use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use shelfload_core::{AuthorStore, Book, StoreError, UNKNOWN_AUTHOR};
use thiserror::Error;

use super::RecordError;
use super::fields::{
    JsonObject, optional_array, optional_object, optional_string, parse_tagged_object,
    required_str, strip_key_prefix, text_of,
};
use super::AUTHOR_KEY_PREFIX;

/// Prefix carried by work keys in the dump (`/works/OL1W`).
pub const WORK_KEY_PREFIX: &str = "/works/";

/// `chrono` rendering of `yyyy-MM-dd'T'HH:mm:ss.SSSSSS`, the format of
/// `created.value`. Exactly six fractional digits are required.
pub const PUBLISHED_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.%6f";

/// Failure while extracting a book.
#[derive(Debug, Error)]
pub enum ExtractBookError {
    /// The line itself is malformed; skip it.
    #[error(transparent)]
    Record(#[from] RecordError),
    /// The author store could not answer a lookup.
    #[error("failed to look up author {author_id}")]
    AuthorLookup {
        /// Author id being resolved.
        author_id: String,
        /// Store failure.
        #[source]
        source: StoreError,
    },
}

/// Parse one works dump line and resolve its author names.
///
/// Author names are looked up in `authors` in the order the ids appear; ids
/// with no stored author resolve to [`UNKNOWN_AUTHOR`]. Resolution only finds
/// authors that were persisted before this call, so the author pass should
/// complete before works are extracted.
///
/// # Examples
/// ```
/// use shelfload_core::{Author, MemoryStore};
/// use shelfload_data::extract_book;
///
/// let authors = MemoryStore::with_authors([Author::new("OL1A", "Jane Doe", "Jane Doe")]);
/// let line = r#"/type/work {"key":"/works/OL1W","title":"Test Book","covers":[1,2],"authors":[{"author":{"key":"/authors/OL1A"}}]}"#;
///
/// let book = extract_book(line, &authors)?;
/// assert_eq!(book.id, "OL1W");
/// assert_eq!(book.cover_ids, ["1", "2"]);
/// assert_eq!(book.author_names, ["Jane Doe"]);
/// # Ok::<(), shelfload_data::ExtractBookError>(())
/// ```
pub fn extract_book<A>(line: &str, authors: &A) -> Result<Book, ExtractBookError>
where
    A: AuthorStore + ?Sized,
{
    let record = parse_tagged_object(line)?;
    let mut book = parse_work(&record)?;
    book.author_names = resolve_author_names(&book.author_ids, authors)?;
    Ok(book)
}

fn parse_work(record: &JsonObject) -> Result<Book, RecordError> {
    let key = required_str(record, "key", "key")?;
    Ok(Book {
        id: strip_key_prefix(key, WORK_KEY_PREFIX),
        name: optional_string(record, "title"),
        description: optional_object(record, "description")
            .map(|description| optional_string(description, "value"))
            .unwrap_or_default(),
        published_date: published_date(record)?,
        cover_ids: cover_ids(record)?,
        author_ids: author_ids(record)?,
        author_names: Vec::new(),
    })
}

fn published_date(record: &JsonObject) -> Result<Option<NaiveDate>, RecordError> {
    let Some(created) = optional_object(record, "created") else {
        return Ok(None);
    };
    let value = required_str(created, "value", "created.value")?;
    NaiveDateTime::parse_from_str(value, PUBLISHED_TIMESTAMP_FORMAT)
        .map(|timestamp| Some(timestamp.date()))
        .map_err(|source| RecordError::MalformedTimestamp {
            value: value.to_owned(),
            source,
        })
}

fn cover_ids(record: &JsonObject) -> Result<Vec<String>, RecordError> {
    let Some(covers) = optional_array(record, "covers") else {
        return Ok(Vec::new());
    };
    covers
        .iter()
        .enumerate()
        .map(|(index, cover)| match cover {
            Value::String(_) | Value::Number(_) | Value::Bool(_) => Ok(text_of(cover)),
            _ => Err(RecordError::invalid(
                format!("covers[{index}]"),
                "a string or number",
            )),
        })
        .collect()
}

fn author_ids(record: &JsonObject) -> Result<Vec<String>, RecordError> {
    let Some(authors) = optional_array(record, "authors") else {
        return Ok(Vec::new());
    };
    authors
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let entry = entry
                .as_object()
                .ok_or_else(|| RecordError::invalid(format!("authors[{index}]"), "an object"))?;
            let author = match entry.get("author") {
                Some(Value::Object(author)) => author,
                None | Some(Value::Null) => {
                    return Err(RecordError::missing(format!("authors[{index}].author")));
                }
                Some(_) => {
                    return Err(RecordError::invalid(
                        format!("authors[{index}].author"),
                        "an object",
                    ));
                }
            };
            let key = required_str(author, "key", &format!("authors[{index}].author.key"))?;
            Ok(strip_key_prefix(key, AUTHOR_KEY_PREFIX))
        })
        .collect()
}

fn resolve_author_names<A>(ids: &[String], authors: &A) -> Result<Vec<String>, ExtractBookError>
where
    A: AuthorStore + ?Sized,
{
    ids.iter()
        .map(|id| {
            let found = authors
                .get_author(id)
                .map_err(|source| ExtractBookError::AuthorLookup {
                    author_id: id.clone(),
                    source,
                })?;
            Ok(found.map_or_else(|| UNKNOWN_AUTHOR.to_owned(), |author| author.name))
        })
        .collect()
}
