use shelfload_core::Author;

use super::RecordError;
use super::fields::{optional_string, parse_tagged_object, strip_key_prefix};

/// Prefix carried by author keys in the dump (`/authors/OL1A`).
pub const AUTHOR_KEY_PREFIX: &str = "/authors/";

/// Parse one author dump line.
///
/// `key`, `name` and `personal_name` are optional and default to empty
/// strings. A line whose key is missing or empty is rejected with
/// [`RecordError::EmptyId`] because an author without an id cannot be stored.
///
/// # Examples
/// ```
/// use shelfload_data::extract_author;
///
/// let author = extract_author(r#"/type/author {"key":"/authors/OL1A","name":"Jane Doe"}"#)?;
/// assert_eq!(author.id, "OL1A");
/// assert_eq!(author.name, "Jane Doe");
/// assert_eq!(author.personal_name, "");
/// # Ok::<(), shelfload_data::RecordError>(())
/// ```
pub fn extract_author(line: &str) -> Result<Author, RecordError> {
    let record = parse_tagged_object(line)?;
    let id = strip_key_prefix(&optional_string(&record, "key"), AUTHOR_KEY_PREFIX);
    if id.is_empty() {
        return Err(RecordError::EmptyId);
    }
    Ok(Author {
        id,
        name: optional_string(&record, "name"),
        personal_name: optional_string(&record, "personal_name"),
    })
}
