use crate::common::sample_tree;
use clap::Parser;
use std::fs;
use tempfile::tempdir;
use zipcmt::cli::Cli;
use zipcmt::error::ExitCode;
use zipcmt::run_app;

fn cli(args: &[&str]) -> Cli {
    Cli::parse_from(std::iter::once("zipcmt").chain(args.iter().copied()))
}

#[test]
fn test_run_app_success() {
    let dir = tempdir().unwrap();
    sample_tree(dir.path());
    let path = dir.path().to_str().unwrap();

    let code = run_app(cli(&["--quiet", path])).unwrap();

    assert_eq!(code, ExitCode::Success);
}

#[test]
fn test_run_app_saves_to_directory() {
    let dir = tempdir().unwrap();
    let out = tempdir().unwrap();
    sample_tree(dir.path());

    let code = run_app(cli(&[
        "-q",
        "--all",
        "-d",
        out.path().to_str().unwrap(),
        dir.path().to_str().unwrap(),
    ]))
    .unwrap();

    assert_eq!(code, ExitCode::Success);
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 3);
    assert_eq!(
        fs::read_to_string(out.path().join("c-zipcomment.txt")).unwrap(),
        "world\n"
    );
}

#[test]
fn test_run_app_missing_root() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");

    let code = run_app(cli(&["-q", missing.to_str().unwrap()])).unwrap();

    assert_eq!(code, ExitCode::GeneralError);
}

#[test]
fn test_run_app_partial_failure() {
    let dir = tempdir().unwrap();
    sample_tree(dir.path());
    let missing = dir.path().join("missing");

    let code = run_app(cli(&[
        "-q",
        missing.to_str().unwrap(),
        dir.path().to_str().unwrap(),
    ]))
    .unwrap();

    assert_eq!(code, ExitCode::PartialSuccess);
}

#[test]
fn test_run_app_json_summary() {
    let dir = tempdir().unwrap();
    sample_tree(dir.path());

    let code = run_app(cli(&["--json", "--no-color", dir.path().to_str().unwrap()])).unwrap();

    assert_eq!(code, ExitCode::Success);
}

#[test]
fn test_run_app_quiet_with_bad_save_dir() {
    let dir = tempdir().unwrap();
    sample_tree(dir.path());
    let missing = dir.path().join("no-such-dir");

    let code = run_app(cli(&[
        "-q",
        "-d",
        missing.to_str().unwrap(),
        dir.path().to_str().unwrap(),
    ]))
    .unwrap();

    assert_eq!(code, ExitCode::PartialSuccess);
    assert!(!missing.exists());
}
