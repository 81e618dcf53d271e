//! Pipeline integration tests covering the load command flow.

#![cfg(feature = "store-sqlite")]

use super::helpers::{AUTHOR_LINE, WORK_LINE, Workspace};
use super::*;
use crate::load::{LoadArgs, run_load};
use rstest::rstest;
use rusqlite::Connection;
use shelfload_core::{AuthorStore, BookStore, SqliteStore, UNKNOWN_AUTHOR};
use shelfload_data::{FailureKind, LoadError, Pass};

fn args_for(workspace: &Workspace) -> LoadArgs {
    LoadArgs {
        authors_dump: Some(workspace.authors_dump()),
        works_dump: Some(workspace.works_dump()),
        database: Some(workspace.database()),
        ..LoadArgs::default()
    }
}

#[rstest]
fn load_pipeline_populates_database() {
    let workspace = Workspace::new();

    let outcome = run_load(args_for(&workspace)).expect("pipeline should succeed");

    assert_eq!(outcome.database, workspace.database());
    assert_eq!(outcome.authors.loaded, 1);
    assert_eq!(outcome.works.loaded, 1);
    let store = SqliteStore::open(&outcome.database).expect("reopen catalogue");
    let author = store
        .get_author("OL1A")
        .expect("look up author")
        .expect("author should be stored");
    assert_eq!(author.name, "Jane Doe");
    let book = store
        .get_book("OL1W")
        .expect("look up book")
        .expect("book should be stored");
    assert_eq!(book.author_names, ["Jane Doe"]);
    assert_eq!(book.cover_ids, ["1", "2"]);
}

#[rstest]
fn rerunning_load_keeps_one_row_per_id() {
    let workspace = Workspace::new();

    run_load(args_for(&workspace)).expect("first run");
    run_load(args_for(&workspace)).expect("second run");

    let conn = Connection::open(workspace.database().as_std_path()).expect("open catalogue");
    let authors: i64 = conn
        .query_row("SELECT COUNT(*) FROM authors", [], |row| row.get(0))
        .expect("count authors");
    let books: i64 = conn
        .query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))
        .expect("count books");
    assert_eq!((authors, books), (1, 1));
}

#[rstest]
fn malformed_lines_do_not_fail_the_run() {
    let workspace = Workspace::new();
    let works = workspace.write_dump(
        "mixed-works.txt",
        &[
            r#"/type/work {"key":"/works/OL2W","created":{"value":"yesterday"}}"#,
            WORK_LINE,
        ],
    );
    let args = LoadArgs {
        works_dump: Some(works),
        ..args_for(&workspace)
    };

    let outcome = run_load(args).expect("skipped lines should not fail the run");

    assert_eq!(outcome.works.loaded, 1);
    let kinds: Vec<_> = outcome.works.skipped.iter().map(|line| line.kind()).collect();
    assert_eq!(kinds, [FailureKind::MalformedTimestamp]);
}

#[rstest]
fn missing_author_dump_fails_after_loading_works() {
    let workspace = Workspace::new();
    let missing = workspace.root().join("missing-authors.txt");
    let args = LoadArgs {
        authors_dump: Some(missing.clone()),
        ..args_for(&workspace)
    };

    let err = run_load(args).expect_err("a missing author dump should fail the run");

    match err {
        CliError::PassAborted { pass, source } => {
            assert_eq!(pass, Pass::Authors);
            let LoadError::SourceUnavailable(unavailable) = source.as_ref() else {
                panic!("expected the author dump to be unavailable, found {source:?}");
            };
            assert_eq!(unavailable.path, missing);
        }
        other => panic!("expected PassAborted, found {other:?}"),
    }
    let store = SqliteStore::open(&workspace.database()).expect("reopen catalogue");
    let book = store
        .get_book("OL1W")
        .expect("look up book")
        .expect("work pass should still run");
    assert_eq!(book.author_names, [UNKNOWN_AUTHOR]);
}

#[rstest]
fn invalid_utf8_author_line_is_skipped() {
    let workspace = Workspace::new();
    let authors = workspace.root().join("authors.bin");
    let mut bytes = vec![0xff, 0xfe, b'\n'];
    bytes.extend_from_slice(AUTHOR_LINE.as_bytes());
    std::fs::write(&authors, bytes).expect("write dump");
    let args = LoadArgs {
        authors_dump: Some(authors),
        ..args_for(&workspace)
    };

    let outcome = run_load(args).expect("an undecodable line should not fail the run");

    assert_eq!(outcome.authors.loaded, 1);
    let skipped: Vec<_> = outcome
        .authors
        .skipped
        .iter()
        .map(|line| (line.line, line.kind()))
        .collect();
    assert_eq!(skipped, [(1, FailureKind::MalformedRecord)]);
}

#[rstest]
fn author_limit_is_forwarded() {
    let workspace = Workspace::new();
    let authors = workspace.write_dump(
        "two-authors.txt",
        &[AUTHOR_LINE, r#"/type/author {"key":"/authors/OL2A"}"#],
    );
    let args = LoadArgs {
        authors_dump: Some(authors),
        author_limit: Some(1),
        ..args_for(&workspace)
    };

    let outcome = run_load(args).expect("pipeline should succeed");

    assert_eq!(outcome.authors.lines_read, 1);
}
