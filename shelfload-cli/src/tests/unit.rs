//! Focused unit tests covering load CLI configuration validation.

use super::helpers::Workspace;
use super::*;
use crate::load::LoadArgs;
use camino::Utf8PathBuf;
use rstest::rstest;
use shelfload_data::DEFAULT_WORK_LIMIT;
use std::fs;

fn complete_args() -> LoadArgs {
    LoadArgs {
        authors_dump: Some(Utf8PathBuf::from("authors.txt")),
        works_dump: Some(Utf8PathBuf::from("works.txt")),
        database: Some(Utf8PathBuf::from("catalogue.sqlite")),
        ..LoadArgs::default()
    }
}

#[rstest]
#[case::authors(
    LoadArgs { authors_dump: None, ..complete_args() },
    ARG_AUTHORS_DUMP,
    ENV_AUTHORS_DUMP
)]
#[case::works(
    LoadArgs { works_dump: None, ..complete_args() },
    ARG_WORKS_DUMP,
    ENV_WORKS_DUMP
)]
#[case::database(
    LoadArgs { database: None, ..complete_args() },
    ARG_DATABASE,
    ENV_DATABASE
)]
fn converting_without_required_fields_errors(
    #[case] args: LoadArgs,
    #[case] field: &'static str,
    #[case] env_var: &'static str,
) {
    let err = LoadConfig::try_from(args).expect_err("missing field should error");
    match err {
        CliError::MissingArgument {
            field: missing,
            env,
        } => {
            assert_eq!(missing, field);
            assert_eq!(env, env_var);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
#[case::default_limit(None, false, Some(DEFAULT_WORK_LIMIT))]
#[case::explicit_limit(Some(5), false, Some(5))]
#[case::all_works(None, true, None)]
fn work_limit_resolution(
    #[case] work_limit: Option<usize>,
    #[case] all_works: bool,
    #[case] expected: Option<usize>,
) {
    let args = LoadArgs {
        work_limit,
        all_works,
        ..complete_args()
    };

    let config = LoadConfig::try_from(args).expect("config should resolve");

    assert_eq!(config.work_limit, expected);
    assert_eq!(config.author_limit, None);
    assert_eq!(config.loader_config().work_limit, expected);
}

#[rstest]
fn work_limit_conflicts_with_all_works() {
    let args = LoadArgs {
        work_limit: Some(10),
        all_works: true,
        ..complete_args()
    };

    let err = LoadConfig::try_from(args).expect_err("conflicting limits should error");

    assert!(matches!(err, CliError::ConflictingLimits { .. }));
}

#[rstest]
fn validate_sources_leaves_missing_dumps_to_the_loader() {
    let workspace = Workspace::new();
    let config = LoadConfig {
        authors_dump: workspace.root().join("missing-authors.txt"),
        works_dump: workspace.works_dump(),
        database: workspace.database(),
        work_limit: Some(DEFAULT_WORK_LIMIT),
        author_limit: None,
    };

    config
        .validate_sources()
        .expect("a missing dump should be reported by its pass");
}

#[rstest]
fn validate_sources_rejects_directories() {
    let workspace = Workspace::new();
    let directory = workspace.root().join("works");
    fs::create_dir(&directory).expect("create directory");
    let config = LoadConfig {
        authors_dump: workspace.authors_dump(),
        works_dump: directory,
        database: workspace.database(),
        work_limit: Some(DEFAULT_WORK_LIMIT),
        author_limit: None,
    };

    let err = config
        .validate_sources()
        .expect_err("expected directory rejection");
    match err {
        CliError::SourcePathNotFile { field, .. } => assert_eq!(field, ARG_WORKS_DUMP),
        other => panic!("unexpected error {other:?}"),
    }
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "work_limit": "many" }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let workspace = Workspace::new();
    let root = workspace.root();
    let env_works = root.join("from-env-works.txt");
    let cli_database = root.join("from-cli.sqlite");
    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "authors_dump": root.join("from-file-authors.txt").as_str(),
            "works_dump": root.join("from-file-works.txt").as_str(),
            "database": root.join("from-file.sqlite").as_str(),
            "author_limit": 10,
        }),
        None,
    );
    composer.push_environment(json!({
        "works_dump": env_works.as_str(),
        "work_limit": 7,
    }));
    composer.push_cli(json!({
        "database": cli_database.as_str(),
    }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.authors_dump, root.join("from-file-authors.txt"));
    assert_eq!(config.works_dump, env_works);
    assert_eq!(config.database, cli_database);
    assert_eq!(config.work_limit, Some(7));
    assert_eq!(config.author_limit, Some(10));
}
