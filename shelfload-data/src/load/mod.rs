//! Author and work passes over the dump files.
//!
//! Each pass streams its dump in file order, extracts one record per line and
//! upserts it before the next line is read. A line that cannot be decoded,
//! extracted, resolved or stored is logged and collected in the
//! [`PassReport`]; the pass carries on. Only failures of the dump file itself
//! end the pass with a [`LoadError`].

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, error, info, warn};
use shelfload_core::{AuthorStore, BookStore, StoreError};
use thiserror::Error;

use crate::dump::{DumpLine, ReadLineError, SourceUnavailable, open_dump};
use crate::extract::{ExtractBookError, FailureKind, RecordError, extract_author, extract_book};

/// Number of works loaded when no explicit limit is configured.
pub const DEFAULT_WORK_LIMIT: usize = 50;

/// Dump locations and per-pass line limits.
///
/// # Examples
/// ```
/// use shelfload_data::{DEFAULT_WORK_LIMIT, LoaderConfig};
///
/// let config = LoaderConfig::new("authors.txt", "works.txt");
/// assert_eq!(config.work_limit, Some(DEFAULT_WORK_LIMIT));
/// assert_eq!(config.author_limit, None);
///
/// let config = config.with_work_limit(None);
/// assert_eq!(config.work_limit, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Author dump path.
    pub authors_dump: Utf8PathBuf,
    /// Works dump path.
    pub works_dump: Utf8PathBuf,
    /// Maximum number of author lines to read; `None` reads the whole dump.
    pub author_limit: Option<usize>,
    /// Maximum number of work lines to read; `None` reads the whole dump.
    pub work_limit: Option<usize>,
}

impl LoaderConfig {
    /// Configure both dumps with the default limits.
    pub fn new(authors_dump: impl Into<Utf8PathBuf>, works_dump: impl Into<Utf8PathBuf>) -> Self {
        Self {
            authors_dump: authors_dump.into(),
            works_dump: works_dump.into(),
            author_limit: None,
            work_limit: Some(DEFAULT_WORK_LIMIT),
        }
    }

    /// Replace the author line limit.
    #[must_use]
    pub fn with_author_limit(mut self, limit: Option<usize>) -> Self {
        self.author_limit = limit;
        self
    }

    /// Replace the work line limit.
    #[must_use]
    pub fn with_work_limit(mut self, limit: Option<usize>) -> Self {
        self.work_limit = limit;
        self
    }
}

/// The two loader passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pass {
    /// Author dump into the author store.
    Authors,
    /// Works dump into the book store.
    Works,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Authors => "author",
            Self::Works => "work",
        })
    }
}

/// Why one line was skipped.
#[derive(Debug, Error)]
pub enum LineError {
    /// The line is not a usable record.
    #[error(transparent)]
    Record(#[from] RecordError),
    /// Resolving an author name failed.
    #[error("failed to look up author {author_id}")]
    AuthorLookup {
        /// Author id being looked up.
        author_id: String,
        /// Store failure.
        #[source]
        source: StoreError,
    },
    /// Writing the extracted record failed.
    #[error("failed to store record")]
    Persist(#[source] StoreError),
}

impl LineError {
    /// Coarse classification of the failure.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Record(err) => err.kind(),
            Self::AuthorLookup { .. } | Self::Persist(_) => FailureKind::Store,
        }
    }
}

impl From<ExtractBookError> for LineError {
    fn from(err: ExtractBookError) -> Self {
        match err {
            ExtractBookError::Record(err) => Self::Record(err),
            ExtractBookError::AuthorLookup { author_id, source } => {
                Self::AuthorLookup { author_id, source }
            }
        }
    }
}

/// A line the pass skipped.
#[derive(Debug)]
pub struct SkippedLine {
    /// 1-based line number within the dump.
    pub line: usize,
    /// Why the line was rejected.
    pub error: LineError,
}

impl SkippedLine {
    /// Coarse classification of the failure.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        self.error.kind()
    }
}

/// Outcome of a pass that ran to completion.
#[derive(Debug)]
pub struct PassReport {
    /// Which pass produced the report.
    pub pass: Pass,
    /// Dump that was read.
    pub source: Utf8PathBuf,
    /// Lines read, including skipped ones.
    pub lines_read: usize,
    /// Records persisted.
    pub loaded: usize,
    /// Rejected lines in file order.
    pub skipped: Vec<SkippedLine>,
}

impl PassReport {
    fn new(pass: Pass, source: &Utf8Path) -> Self {
        Self {
            pass,
            source: source.to_path_buf(),
            lines_read: 0,
            loaded: 0,
            skipped: Vec::new(),
        }
    }
}

/// Failure that ends a pass early.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The dump could not be opened.
    #[error(transparent)]
    SourceUnavailable(#[from] SourceUnavailable),
    /// Reading the open dump failed.
    #[error(transparent)]
    Read(#[from] ReadLineError),
}

/// Outcome of [`Loader::run`].
#[derive(Debug)]
pub struct RunReport {
    /// Author pass result.
    pub authors: Result<PassReport, LoadError>,
    /// Work pass result.
    pub works: Result<PassReport, LoadError>,
}

impl RunReport {
    /// Whether both passes ran to completion. Skipped lines do not count as
    /// failures.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.authors.is_ok() && self.works.is_ok()
    }
}

/// Drives the author and work passes.
///
/// # Examples
/// ```no_run
/// use shelfload_core::MemoryStore;
/// use shelfload_data::{Loader, LoaderConfig};
///
/// let store = MemoryStore::default();
/// let loader = Loader::new(LoaderConfig::new("authors.txt", "works.txt"));
/// let report = loader.run(&store, &store);
/// assert!(report.is_complete());
/// ```
#[derive(Debug, Clone)]
pub struct Loader {
    config: LoaderConfig,
}

impl Loader {
    /// Create a loader for `config`.
    #[must_use]
    pub const fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load every author line (up to the author limit) into `authors`.
    ///
    /// # Errors
    /// Returns [`LoadError`] when the dump cannot be opened or read. Malformed
    /// lines and failed writes are reported in the [`PassReport`] instead.
    pub fn load_authors<A>(&self, authors: &A) -> Result<PassReport, LoadError>
    where
        A: AuthorStore + ?Sized,
    {
        run_pass(
            Pass::Authors,
            &self.config.authors_dump,
            self.config.author_limit,
            |text| extract_author(text).map_err(LineError::from),
            |author| authors.put_author(author),
        )
    }

    /// Load work lines (up to the work limit) into `books`, resolving author
    /// names against `authors`.
    ///
    /// Authors must already be loaded; ids missing from `authors` resolve to
    /// the unknown-author placeholder.
    ///
    /// # Errors
    /// Returns [`LoadError`] when the dump cannot be opened or read. Malformed
    /// lines and store failures on a line are reported in the [`PassReport`]
    /// instead.
    pub fn load_works<A, B>(&self, authors: &A, books: &B) -> Result<PassReport, LoadError>
    where
        A: AuthorStore + ?Sized,
        B: BookStore + ?Sized,
    {
        run_pass(
            Pass::Works,
            &self.config.works_dump,
            self.config.work_limit,
            |text| extract_book(text, authors).map_err(LineError::from),
            |book| books.put_book(book),
        )
    }

    /// Run the author pass followed by the work pass.
    ///
    /// The work pass runs even when the author pass fails; names then resolve
    /// against whatever `authors` already holds.
    pub fn run<A, B>(&self, authors: &A, books: &B) -> RunReport
    where
        A: AuthorStore + ?Sized,
        B: BookStore + ?Sized,
    {
        let author_result = self.load_authors(authors);
        if let Err(err) = &author_result {
            error!("Author pass aborted: {err}");
        }
        let work_result = self.load_works(authors, books);
        if let Err(err) = &work_result {
            error!("Work pass aborted: {err}");
        }
        RunReport {
            authors: author_result,
            works: work_result,
        }
    }
}

fn run_pass<T, E, P>(
    pass: Pass,
    path: &Utf8Path,
    limit: Option<usize>,
    mut extract: E,
    mut persist: P,
) -> Result<PassReport, LoadError>
where
    E: FnMut(&str) -> Result<T, LineError>,
    P: FnMut(&T) -> Result<(), StoreError>,
{
    info!("Starting {pass} pass over {path}");
    let lines = open_dump(path)?;
    let report = lines.take(limit.unwrap_or(usize::MAX)).try_fold(
        PassReport::new(pass, path),
        |mut report, line| {
            let line = line?;
            report.lines_read += 1;
            match load_line(&line, &mut extract, &mut persist) {
                Ok(()) => {
                    debug!("Stored {pass} record from line {}", line.number);
                    report.loaded += 1;
                }
                Err(error) => {
                    warn!(
                        "Skipping {pass} line {} ({}): {error}",
                        line.number,
                        error.kind()
                    );
                    report.skipped.push(SkippedLine {
                        line: line.number,
                        error,
                    });
                }
            }
            Ok::<_, LoadError>(report)
        },
    )?;
    info!(
        "Finished {pass} pass over {path}: {} lines read, {} loaded, {} skipped",
        report.lines_read,
        report.loaded,
        report.skipped.len()
    );
    Ok(report)
}

fn load_line<T, E, P>(line: &DumpLine, extract: &mut E, persist: &mut P) -> Result<(), LineError>
where
    E: FnMut(&str) -> Result<T, LineError>,
    P: FnMut(&T) -> Result<(), StoreError>,
{
    let text = line
        .text()
        .map_err(|source| RecordError::InvalidUtf8 { source })?;
    let record = extract(text)?;
    persist(&record).map_err(LineError::Persist)
}
