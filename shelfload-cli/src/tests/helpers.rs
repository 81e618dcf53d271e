//! Test helpers for writing dump files into a scratch workspace.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

pub(super) const AUTHOR_LINE: &str = r#"/type/author	/authors/OL1A	1	2008-04-01T03:28:50.625462	{"key":"/authors/OL1A","name":"Jane Doe","personal_name":"Jane Doe"}"#;
pub(super) const WORK_LINE: &str = r#"/type/work	/works/OL1W	1	2009-12-11T01:57:19.964652	{"key":"/works/OL1W","title":"Test Book","covers":[1,2],"authors":[{"author":{"key":"/authors/OL1A"}}]}"#;

/// Scratch directory holding dump files and the target database.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root =
            Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace path");
        Self { _dir: dir, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn write_dump(&self, name: &str, lines: &[&str]) -> Utf8PathBuf {
        let path = self.root.join(name);
        fs::write(&path, lines.join("\n")).expect("write dump");
        path
    }

    pub(super) fn authors_dump(&self) -> Utf8PathBuf {
        self.write_dump("authors.txt", &[AUTHOR_LINE])
    }

    pub(super) fn works_dump(&self) -> Utf8PathBuf {
        self.write_dump("works.txt", &[WORK_LINE])
    }

    pub(super) fn database(&self) -> Utf8PathBuf {
        self.root.join("db").join("catalogue.sqlite")
    }
}
