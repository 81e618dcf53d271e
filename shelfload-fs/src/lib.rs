//! Capability-based filesystem helpers shared by the shelfload crates.
//!
//! Every helper resolves an ambient directory handle with `cap-std` and then
//! works relative to it, so callers only ever hand in UTF-8 (`camino`) paths.
#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use std::io;
use std::path::Component;

/// Open an existing file for reading.
///
/// # Examples
/// ```
/// use camino::Utf8Path;
///
/// let missing = shelfload_fs::open_file(Utf8Path::new("definitely/not/here.txt"));
/// assert!(missing.is_err());
/// ```
pub fn open_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Report whether `path` names a regular file.
///
/// Returns `Ok(false)` for directories and other non-file entries and an
/// [`io::ErrorKind::NotFound`] error when nothing exists at `path`.
pub fn is_regular_file(path: &Utf8Path) -> io::Result<bool> {
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("path should name a file"))?;
    let dir = fs_utf8::Dir::open_ambient_dir(parent_or_current(path), ambient_authority())?;
    dir.metadata(file_name).map(|meta| meta.is_file())
}

/// Create every missing directory above `path`.
///
/// Paths without a parent, or whose parent is the filesystem root, need no
/// work and return immediately.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() || parent == Utf8Path::new("/") {
        return Ok(());
    }

    let (base, relative) = split_ambient_base(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    dir.create_dir_all(&relative)
}

fn parent_or_current(path: &Utf8Path) -> &Utf8Path {
    match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    }
}

// cap-std refuses absolute paths relative to a directory handle, so absolute
// parents are split into their root (or Windows prefix) and the remainder.
fn split_ambient_base(parent: &Utf8Path) -> io::Result<(Utf8PathBuf, Utf8PathBuf)> {
    let std_parent = parent.as_std_path();
    let base = match std_parent.components().next() {
        Some(Component::Prefix(prefix)) => {
            let prefix = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            Utf8PathBuf::from(prefix).join(std::path::MAIN_SEPARATOR_STR)
        }
        Some(Component::RootDir) => Utf8PathBuf::from(std::path::MAIN_SEPARATOR_STR),
        _ => return Ok((Utf8PathBuf::from("."), parent.to_path_buf())),
    };
    let relative = parent
        .strip_prefix(&base)
        .map_err(|_| io::Error::other("failed to strip root from absolute path"))?;
    Ok((base, relative.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::fs;
    use tempfile::TempDir;

    #[fixture]
    fn workspace() -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().expect("create temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
        (dir, root)
    }

    #[rstest]
    fn creates_nested_parents(workspace: (TempDir, Utf8PathBuf)) {
        let (_dir, root) = workspace;
        let target = root.join("a").join("b").join("catalogue.db");

        ensure_parent_dir(&target).expect("create parents");

        assert!(root.join("a").join("b").is_dir());
    }

    #[rstest]
    fn bare_file_names_need_no_parent() {
        ensure_parent_dir(Utf8Path::new("catalogue.db")).expect("nothing to create");
    }

    #[rstest]
    fn distinguishes_files_from_directories(workspace: (TempDir, Utf8PathBuf)) {
        let (_dir, root) = workspace;
        let file = root.join("authors.txt");
        fs::write(&file, "tag {}\n").expect("write file");

        assert!(is_regular_file(&file).expect("inspect file"));
        assert!(!is_regular_file(&root).expect("inspect directory"));
    }

    #[rstest]
    fn missing_entries_report_not_found(workspace: (TempDir, Utf8PathBuf)) {
        let (_dir, root) = workspace;
        let err = is_regular_file(&root.join("absent.txt")).expect_err("nothing there");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[rstest]
    fn opens_existing_files(workspace: (TempDir, Utf8PathBuf)) {
        let (_dir, root) = workspace;
        let file = root.join("works.txt");
        fs::write(&file, "tag {}\n").expect("write file");

        assert!(open_file(&file).is_ok());
    }
}
