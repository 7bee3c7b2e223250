use std::fs;
use std::io;

use gatling_events::runs::{
    ensure_results_folder, list_run_directories, RunDirectories, LAST_RUN_FILE,
};
use tempfile::TempDir;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Gatling failed.")]
struct RunFailed(#[source] io::Error);

#[test]
fn missing_results_folder_has_no_runs() {
    let dir = TempDir::new().unwrap();
    let runs = list_run_directories(&dir.path().join("nope")).unwrap();
    assert!(runs.is_empty());
}

#[test]
fn ensure_results_folder_creates_nested() {
    let dir = TempDir::new().unwrap();
    let results = dir.path().join("target").join("gatling");
    ensure_results_folder(&results).unwrap();
    assert!(results.is_dir());
}

#[test]
fn files_are_not_run_directories() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("basicsimulation-1")).unwrap();
    fs::write(dir.path().join(LAST_RUN_FILE), "x").unwrap();

    let runs = list_run_directories(dir.path()).unwrap();
    assert_eq!(runs.into_iter().collect::<Vec<_>>(), vec!["basicsimulation-1"]);
}

#[test]
fn last_run_lists_only_new_directories() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("old-run")).unwrap();

    let snapshot = RunDirectories::snapshot(dir.path()).unwrap();
    fs::create_dir(dir.path().join("new-run-a")).unwrap();
    fs::create_dir(dir.path().join("new-run-b")).unwrap();

    let path = snapshot.record_last_run(None).unwrap();
    let content = fs::read_to_string(path).unwrap();
    assert_eq!(content, "new-run-a\nnew-run-b\n");
}

#[test]
fn last_run_records_error_line() {
    let dir = TempDir::new().unwrap();
    let snapshot = RunDirectories::snapshot(dir.path()).unwrap();
    fs::create_dir(dir.path().join("failed-run")).unwrap();

    let failure = RunFailed(io::Error::new(io::ErrorKind::Other, "exit code 2"));
    let path = snapshot.record_last_run(Some(&failure)).unwrap();
    let content = fs::read_to_string(path).unwrap();
    assert_eq!(content, "failed-run\nError: Gatling failed. | exit code 2\n");
}

#[test]
fn snapshot_can_be_rebuilt_from_names() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("a")).unwrap();
    fs::create_dir(dir.path().join("b")).unwrap();

    let snapshot = RunDirectories::with_existing(dir.path(), ["a"]);
    assert_eq!(snapshot.new_directories().unwrap(), vec!["b".to_string()]);
}
