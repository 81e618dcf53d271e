//! Line-oriented access to dump files.
//!
//! A dump holds one record per line. The reader does no parsing; it hands
//! back each line with its 1-based line number and the terminator removed.
//! Lines are kept as raw bytes so that one badly encoded record can be
//! rejected on its own.

use std::io::{self, BufRead, BufReader};
use std::str::{self, Utf8Error};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::fs_utf8::File;
use thiserror::Error;

/// The dump file could not be opened for reading.
#[derive(Debug, Error)]
#[error("dump file {path:?} is unavailable")]
pub struct SourceUnavailable {
    /// Path that failed to open.
    pub path: Utf8PathBuf,
    /// Underlying I/O error.
    #[source]
    pub source: io::Error,
}

/// Reading an already opened dump failed part-way through.
#[derive(Debug, Error)]
#[error("failed to read line {line} of {source_name}")]
pub struct ReadLineError {
    /// Human-readable name of the dump (normally its path).
    pub source_name: String,
    /// 1-based number of the line that could not be read.
    pub line: usize,
    /// Underlying I/O error.
    #[source]
    pub source: io::Error,
}

/// One raw line of a dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpLine {
    /// 1-based position of the line in the dump.
    pub number: usize,
    /// Line contents without the trailing `\n` or `\r\n`.
    pub bytes: Vec<u8>,
}

impl DumpLine {
    /// Line contents as UTF-8 text.
    ///
    /// # Errors
    /// Returns the decoding error when the line is not valid UTF-8.
    pub fn text(&self) -> Result<&str, Utf8Error> {
        str::from_utf8(&self.bytes)
    }
}

/// Lazy, single-use sequence of dump lines.
///
/// The iterator stops after the first I/O error. Invalid UTF-8 is not an I/O
/// error here; it surfaces through [`DumpLine::text`]. Dropping the iterator
/// closes the underlying file.
#[derive(Debug)]
pub struct DumpLines<R = BufReader<File>> {
    reader: R,
    source_name: String,
    line_number: usize,
    finished: bool,
}

/// Open the dump at `path` for line-by-line reading.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use shelfload_data::open_dump;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// for line in open_dump(Utf8Path::new("ol_dump_authors.txt"))? {
///     let line = line?;
///     println!("{}: {} bytes", line.number, line.bytes.len());
/// }
/// # Ok(())
/// # }
/// ```
pub fn open_dump(path: &Utf8Path) -> Result<DumpLines, SourceUnavailable> {
    let file = shelfload_fs::open_file(path).map_err(|source| SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(DumpLines::from_reader(BufReader::new(file), path.as_str()))
}

impl<R: BufRead> DumpLines<R> {
    /// Wrap an already buffered reader; `source_name` labels read errors.
    pub fn from_reader(reader: R, source_name: impl Into<String>) -> Self {
        Self {
            reader,
            source_name: source_name.into(),
            line_number: 0,
            finished: false,
        }
    }
}

impl<R: BufRead> Iterator for DumpLines<R> {
    type Item = Result<DumpLine, ReadLineError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let mut bytes = Vec::new();
        match self.reader.read_until(b'\n', &mut bytes) {
            Ok(0) => {
                self.finished = true;
                None
            }
            Ok(_) => {
                self.line_number += 1;
                trim_line_ending(&mut bytes);
                Some(Ok(DumpLine {
                    number: self.line_number,
                    bytes,
                }))
            }
            Err(source) => {
                self.finished = true;
                Some(Err(ReadLineError {
                    source_name: self.source_name.clone(),
                    line: self.line_number + 1,
                    source,
                }))
            }
        }
    }
}

fn trim_line_ending(bytes: &mut Vec<u8>) {
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
    }
}
