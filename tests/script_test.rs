//! Tests for the script runner and CLI glue

use std::fs;

use pathtree::cli::commands::run_source;
use pathtree::cli::CliError;
use pathtree::config::Settings;
use pathtree::exitcode;
use pathtree::script::{Runner, ScriptError, DEMO_SCRIPT};
use pathtree::util::testing;
use pathtree::{PathTree, RenderOptions, TreeError};
use rstest::rstest;
use tempfile::TempDir;

#[test]
fn given_demo_script_when_run_then_tree_matches_expected_shape() {
    testing::init_test_setup();
    let tree = run_source(DEMO_SCRIPT, &Settings::default()).unwrap();
    assert_eq!(tree.get_data("/other").unwrap(), 19);
    assert!(tree.get_data("/other/node3").is_err());
    assert_eq!(tree.get_data("/node1").unwrap(), 0);
}

#[test]
fn given_script_when_run_then_outputs_collected_in_order() {
    let mut tree = PathTree::new();
    let report = Runner::new(
        RenderOptions {
            show_values: false,
            root_label: "root".to_string(),
        },
        false,
    )
    .run(&mut tree, "set /a/b 2\nget /a/b\ntree\n")
    .unwrap();

    assert_eq!(report.executed, 3);
    assert_eq!(report.output[0], "2");
    let rendered: Vec<&str> = report.output[1].lines().collect();
    assert_eq!(rendered[0], "root");
    assert!(rendered[1].ends_with("a"));
    assert!(rendered[2].ends_with("b"));
}

#[rstest]
#[case("rm /\n", TreeError::InvalidOperation("cannot remove the root".to_string()), exitcode::USAGE)]
#[case("get /nope\n", TreeError::NotFound("/nope".to_string()), exitcode::DATAERR)]
fn given_failing_script_when_run_then_error_maps_to_exit_code(
    #[case] script: &str,
    #[case] expected: TreeError,
    #[case] code: i32,
) {
    let err = run_source(script, &Settings::default()).unwrap_err();
    assert_eq!(err.exit_code(), code);
    match err {
        CliError::Script(ScriptError::Tree { line, source }) => {
            assert_eq!(line, 1);
            assert_eq!(source, expected);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn given_keep_going_settings_when_run_then_continues_past_errors() {
    let settings = Settings {
        keep_going: true,
        ..Settings::default()
    };
    let tree = run_source("get /x\nset /y 4\n", &settings).unwrap();
    assert_eq!(tree.get_data("/y").unwrap(), 4);
}

#[test]
fn given_script_file_when_read_then_runs_from_disk() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("setup.tree");
    fs::write(&file, "# build\nset /cfg/port 8080\nset /cfg/debug 1\n").unwrap();

    let source = fs::read_to_string(&file).unwrap();
    let tree = run_source(&source, &Settings::default()).unwrap();
    assert_eq!(tree.leaf_paths(), vec!["/cfg/port", "/cfg/debug"]);
}
