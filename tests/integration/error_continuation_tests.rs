use crate::common::{sample_tree, write_zip};
use std::fs;
use tempfile::tempdir;
use zipcmt::config::ScanOptions;
use zipcmt::error::ExitCode;
use zipcmt::scanner::{CommentFinder, FinderError, ScanError};

#[test]
fn test_missing_root_does_not_stop_other_roots() {
    let dir = tempdir().unwrap();
    sample_tree(dir.path());
    let missing = dir.path().join("gone");

    let finder = CommentFinder::new(ScanOptions::default());
    let summary = finder.find_comments(&[missing.as_path(), dir.path()]);

    assert_eq!(summary.zips_seen, 4);
    assert_eq!(summary.root_errors.len(), 1);
    match &summary.root_errors[0].error {
        ScanError::NotFound(path) => assert_eq!(path, &missing),
        other => panic!("Expected NotFound, got: {:?}", other),
    }
    assert_eq!(ExitCode::from_summary(&summary), ExitCode::PartialSuccess);
}

#[test]
fn test_every_root_missing() {
    let dir = tempdir().unwrap();
    let finder = CommentFinder::new(ScanOptions::default());

    let summary = finder.find_comments(&[dir.path().join("a"), dir.path().join("b")]);

    assert!(summary.all_roots_failed());
    assert_eq!(ExitCode::from_summary(&summary), ExitCode::GeneralError);
}

#[test]
fn test_scan_root_reports_missing_root() {
    let dir = tempdir().unwrap();
    let finder = CommentFinder::new(ScanOptions::default());

    let err = finder.scan_root(&dir.path().join("nope")).unwrap_err();

    assert!(matches!(err, FinderError::Scan(ScanError::NotFound(_))));
    assert!(err.to_string().contains("Path not found"));
}

#[test]
fn test_corrupt_archives_are_counted_and_skipped() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.zip"), b"").unwrap();
    fs::write(dir.path().join("b.zip"), b"PK\x03\x04 truncated").unwrap();
    write_zip(dir.path(), "c.zip", b"survivor");

    let summary = CommentFinder::new(ScanOptions::default()).find_comments(&[dir.path()]);

    assert_eq!(summary.zips_seen, 3);
    assert_eq!(summary.unreadable, 2);
    assert_eq!(summary.comments_accepted, 1);
    assert_eq!(ExitCode::from_summary(&summary), ExitCode::Success);
}

#[test]
fn test_export_failure_continues() {
    let dir = tempdir().unwrap();
    write_zip(dir.path(), "a.zip", b"blocked");
    write_zip(dir.path(), "b.zip", b"written");
    // A directory where the export file should go.
    fs::create_dir(dir.path().join("a-zipcomment.txt")).unwrap();

    let options = ScanOptions::default().with_export(true).with_overwrite(true);
    let summary = CommentFinder::new(options).find_comments(&[dir.path()]);

    assert_eq!(summary.comments_accepted, 2);
    assert_eq!(summary.export_errors, 1);
    assert_eq!(summary.saved, 1);
    assert!(dir.path().join("b-zipcomment.txt").is_file());
    assert_eq!(ExitCode::from_summary(&summary), ExitCode::PartialSuccess);
}

#[test]
fn test_save_dir_that_is_a_file() {
    let dir = tempdir().unwrap();
    sample_tree(dir.path());
    let file = dir.path().join("not-a-dir");
    fs::write(&file, b"x").unwrap();

    let options = ScanOptions::default().with_save_dir(Some(file));
    let summary = CommentFinder::new(options).find_comments(&[dir.path()]);

    assert_eq!(summary.comments_accepted, 2);
    assert_eq!(summary.saved, 0);
    let message = summary.config_error.unwrap();
    assert!(message.contains("not-a-dir"), "unexpected message: {message}");
}
