use std::fmt;

use thiserror::Error;

/// Why a single dump line could not be turned into a record.
///
/// Every variant is recoverable: the loader skips the line and carries on.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RecordError {
    /// The raw line is not valid UTF-8.
    #[error("line is not valid UTF-8")]
    InvalidUtf8 {
        /// Decoding error.
        #[source]
        source: std::str::Utf8Error,
    },
    /// The line contains no `{`, so there is no JSON payload to parse.
    #[error("line contains no JSON object")]
    MissingObject,
    /// The payload after the tag is not valid JSON.
    #[error("invalid JSON payload: {source}")]
    Json {
        /// Parser error.
        #[source]
        source: simd_json::Error,
    },
    /// The payload parsed but is not a JSON object.
    #[error("JSON payload is not an object")]
    NotAnObject,
    /// A required field is absent.
    #[error("required field `{field}` is missing")]
    MissingField {
        /// Dotted path of the field, with array indices.
        field: String,
    },
    /// A field is present but has the wrong JSON type.
    #[error("field `{field}` must be {expected}")]
    InvalidField {
        /// Dotted path of the field, with array indices.
        field: String,
        /// Description of the accepted shape.
        expected: &'static str,
    },
    /// The author key is absent or reduces to nothing once its prefix is
    /// stripped.
    #[error("author record has an empty id")]
    EmptyId,
    /// `created.value` does not follow `yyyy-MM-dd'T'HH:mm:ss.SSSSSS`.
    #[error("timestamp {value:?} does not match yyyy-MM-dd'T'HH:mm:ss.SSSSSS")]
    MalformedTimestamp {
        /// Raw timestamp text.
        value: String,
        /// Parser error.
        #[source]
        source: chrono::ParseError,
    },
}

impl RecordError {
    /// Classify the error for reporting.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::MalformedTimestamp { .. } => FailureKind::MalformedTimestamp,
            _ => FailureKind::MalformedRecord,
        }
    }

    pub(super) fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub(super) fn invalid(field: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidField {
            field: field.into(),
            expected,
        }
    }
}

/// Coarse classification of a skipped line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Unparseable JSON or a missing or malformed required field.
    MalformedRecord,
    /// The creation timestamp did not match the expected pattern.
    MalformedTimestamp,
    /// The record store failed while the line was being loaded.
    Store,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MalformedRecord => "malformed record",
            Self::MalformedTimestamp => "malformed timestamp",
            Self::Store => "store failure",
        })
    }
}
