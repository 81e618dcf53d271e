//! SQLite-backed record store.

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension};

use crate::{Author, Book};

use super::schema::initialise_schema;
use super::{AuthorStore, BookStore, StoreError};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Record store persisting authors and books in a SQLite database.
///
/// Every `put_*` call is a single autocommitted statement, so each upsert is
/// atomic on its own and nothing is batched across records.
///
/// # Examples
/// ```
/// use shelfload_core::{Author, AuthorStore, SqliteStore};
///
/// # fn main() -> Result<(), shelfload_core::StoreError> {
/// let store = SqliteStore::open_in_memory()?;
/// store.put_author(&Author::new("OL1A", "Jane Doe", "Jane Doe"))?;
/// assert_eq!(store.author_count()?, 1);
/// # Ok(())
/// # }
/// ```
pub struct SqliteStore {
    connection: Connection,
    location: Option<Utf8PathBuf>,
}

impl fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteStore")
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Open (or create) the database at `path`, creating parent directories
    /// and the schema as needed.
    pub fn open(path: &Utf8Path) -> Result<Self, StoreError> {
        shelfload_fs::ensure_parent_dir(path).map_err(|source| StoreError::CreateDirectory {
            path: path.to_path_buf(),
            source,
        })?;
        let connection =
            Connection::open(path.as_std_path()).map_err(|source| StoreError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        Self::initialise(connection, Some(path.to_path_buf()))
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let connection = Connection::open_in_memory().map_err(|source| StoreError::Sqlite {
            operation: "open in-memory database",
            source,
        })?;
        Self::initialise(connection, None)
    }

    fn initialise(
        mut connection: Connection,
        location: Option<Utf8PathBuf>,
    ) -> Result<Self, StoreError> {
        initialise_schema(&mut connection)?;
        Ok(Self {
            connection,
            location,
        })
    }

    /// Location of the database file, or `None` for in-memory stores.
    pub fn path(&self) -> Option<&Utf8Path> {
        self.location.as_deref()
    }

    /// Number of rows in the `authors` table.
    pub fn author_count(&self) -> Result<usize, StoreError> {
        self.count("SELECT COUNT(*) FROM authors", "count authors")
    }

    /// Number of rows in the `books` table.
    pub fn book_count(&self) -> Result<usize, StoreError> {
        self.count("SELECT COUNT(*) FROM books", "count books")
    }

    #[cfg(test)]
    pub(super) const fn connection(&self) -> &Connection {
        &self.connection
    }

    fn count(&self, sql: &str, operation: &'static str) -> Result<usize, StoreError> {
        let count: i64 = self
            .connection
            .query_row(sql, [], |row| row.get(0))
            .map_err(|source| StoreError::Sqlite { operation, source })?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

impl AuthorStore for SqliteStore {
    fn get_author(&self, id: &str) -> Result<Option<Author>, StoreError> {
        let mut statement = self
            .connection
            .prepare_cached("SELECT id, name, personal_name FROM authors WHERE id = ?1")
            .map_err(|source| StoreError::Sqlite {
                operation: "prepare author lookup",
                source,
            })?;
        statement
            .query_row([id], |row| {
                Ok(Author {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    personal_name: row.get(2)?,
                })
            })
            .optional()
            .map_err(|source| StoreError::Sqlite {
                operation: "look up author",
                source,
            })
    }

    fn put_author(&self, author: &Author) -> Result<(), StoreError> {
        let mut statement = self
            .connection
            .prepare_cached(
                "INSERT INTO authors (id, name, personal_name) VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    personal_name = excluded.personal_name",
            )
            .map_err(|source| StoreError::Sqlite {
                operation: "prepare author upsert",
                source,
            })?;
        statement
            .execute((
                author.id.as_str(),
                author.name.as_str(),
                author.personal_name.as_str(),
            ))
            .map(|_| ())
            .map_err(|source| StoreError::Sqlite {
                operation: "upsert author",
                source,
            })
    }
}

/// Raw column values read back from the `books` table.
struct BookRow {
    id: String,
    name: String,
    description: String,
    published_date: Option<String>,
    cover_ids: String,
    author_ids: String,
    author_names: String,
}

impl BookRow {
    fn into_book(self) -> Result<Book, StoreError> {
        let published_date = self
            .published_date
            .as_deref()
            .map(|raw| {
                NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|err| StoreError::Decode {
                    id: self.id.clone(),
                    field: "published_date",
                    source: Box::new(err),
                })
            })
            .transpose()?;
        Ok(Book {
            published_date,
            cover_ids: decode_list(&self.id, "cover_ids", &self.cover_ids)?,
            author_ids: decode_list(&self.id, "author_ids", &self.author_ids)?,
            author_names: decode_list(&self.id, "author_names", &self.author_names)?,
            id: self.id,
            name: self.name,
            description: self.description,
        })
    }
}

fn encode_list(id: &str, field: &'static str, values: &[String]) -> Result<String, StoreError> {
    serde_json::to_string(values).map_err(|source| StoreError::Encode {
        id: id.to_owned(),
        field,
        source,
    })
}

fn decode_list(id: &str, field: &'static str, raw: &str) -> Result<Vec<String>, StoreError> {
    serde_json::from_str(raw).map_err(|err| StoreError::Decode {
        id: id.to_owned(),
        field,
        source: Box::new(err),
    })
}

impl BookStore for SqliteStore {
    fn get_book(&self, id: &str) -> Result<Option<Book>, StoreError> {
        let mut statement = self
            .connection
            .prepare_cached(
                "SELECT id, name, description, published_date, cover_ids, author_ids, author_names
                 FROM books WHERE id = ?1",
            )
            .map_err(|source| StoreError::Sqlite {
                operation: "prepare book lookup",
                source,
            })?;
        let row = statement
            .query_row([id], |row| {
                Ok(BookRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                    published_date: row.get(3)?,
                    cover_ids: row.get(4)?,
                    author_ids: row.get(5)?,
                    author_names: row.get(6)?,
                })
            })
            .optional()
            .map_err(|source| StoreError::Sqlite {
                operation: "look up book",
                source,
            })?;
        row.map(BookRow::into_book).transpose()
    }

    fn put_book(&self, book: &Book) -> Result<(), StoreError> {
        let cover_ids = encode_list(&book.id, "cover_ids", &book.cover_ids)?;
        let author_ids = encode_list(&book.id, "author_ids", &book.author_ids)?;
        let author_names = encode_list(&book.id, "author_names", &book.author_names)?;
        let published_date = book
            .published_date
            .map(|date| date.format(DATE_FORMAT).to_string());

        let mut statement = self
            .connection
            .prepare_cached(
                "INSERT INTO books (
                    id, name, description, published_date, cover_ids, author_ids, author_names
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    description = excluded.description,
                    published_date = excluded.published_date,
                    cover_ids = excluded.cover_ids,
                    author_ids = excluded.author_ids,
                    author_names = excluded.author_names",
            )
            .map_err(|source| StoreError::Sqlite {
                operation: "prepare book upsert",
                source,
            })?;
        statement
            .execute((
                book.id.as_str(),
                book.name.as_str(),
                book.description.as_str(),
                published_date,
                cover_ids,
                author_ids,
                author_names,
            ))
            .map(|_| ())
            .map_err(|source| StoreError::Sqlite {
                operation: "upsert book",
                source,
            })
    }
}
