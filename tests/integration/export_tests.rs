use crate::common::write_zip;
use filetime::FileTime;
use std::fs;
use tempfile::tempdir;
use zipcmt::config::ScanOptions;
use zipcmt::scanner::CommentFinder;

#[test]
fn test_export_alongside_archives() {
    let dir = tempdir().unwrap();
    write_zip(dir.path(), "a.zip", b"first");
    write_zip(dir.path(), "sub/b.zip", b"second\n");

    let options = ScanOptions::default().with_export(true);
    let summary = CommentFinder::new(options).find_comments(&[dir.path()]);

    assert_eq!(summary.saved, 2);
    assert_eq!(
        fs::read_to_string(dir.path().join("a-zipcomment.txt")).unwrap(),
        "first\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("sub/b-zipcomment.txt")).unwrap(),
        "second\n"
    );
}

#[test]
fn test_export_skips_then_overwrites() {
    let dir = tempdir().unwrap();
    write_zip(dir.path(), "a.zip", b"fresh");
    let export = dir.path().join("a-zipcomment.txt");
    fs::write(&export, "stale").unwrap();

    let options = ScanOptions::default().with_export(true);
    let summary = CommentFinder::new(options.clone()).find_comments(&[dir.path()]);
    assert_eq!(summary.saved, 0);
    assert_eq!(fs::read_to_string(&export).unwrap(), "stale");

    let summary = CommentFinder::new(options.with_overwrite(true)).find_comments(&[dir.path()]);
    assert_eq!(summary.saved, 1);
    assert_eq!(fs::read_to_string(&export).unwrap(), "fresh\n");
}

#[test]
fn test_save_dir_collects_unique_names() {
    let src = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_zip(src.path(), "x/file.zip", b"from x");
    write_zip(src.path(), "y/file.zip", b"from y");
    write_zip(src.path(), "z/file.zip", b"from z");

    let options = ScanOptions::default().with_save_dir(Some(out.path().to_path_buf()));
    let summary = CommentFinder::new(options).find_comments(&[src.path()]);

    assert_eq!(summary.saved, 3);
    let mut names: Vec<_> = fs::read_dir(out.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "file-zipcomment.txt",
            "file-zipcomment_1.txt",
            "file-zipcomment_2.txt"
        ]
    );
    assert_eq!(
        fs::read_to_string(out.path().join("file-zipcomment_2.txt")).unwrap(),
        "from z\n"
    );
}

#[test]
fn test_export_and_save_dir_both_written() {
    let src = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_zip(src.path(), "a.zip", b"twice");

    let options = ScanOptions::default()
        .with_export(true)
        .with_save_dir(Some(out.path().to_path_buf()));
    let summary = CommentFinder::new(options).find_comments(&[src.path()]);

    assert_eq!(summary.comments_accepted, 1);
    assert_eq!(summary.saved, 2);
    assert!(src.path().join("a-zipcomment.txt").exists());
    assert!(out.path().join("a-zipcomment.txt").exists());
}

#[test]
fn test_duplicates_are_not_exported() {
    let src = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_zip(src.path(), "a.zip", b"same");
    write_zip(src.path(), "b.zip", b"same");

    let options = ScanOptions::default().with_save_dir(Some(out.path().to_path_buf()));
    let summary = CommentFinder::new(options).find_comments(&[src.path()]);

    assert_eq!(summary.saved, 1);
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 1);
    assert!(out.path().join("a-zipcomment.txt").exists());
}

#[test]
fn test_saved_files_take_archive_time() {
    let src = tempdir().unwrap();
    let out = tempdir().unwrap();
    let archive = write_zip(src.path(), "old.zip", b"1994");
    let mtime = FileTime::from_unix_time(757_382_400, 0);
    filetime::set_file_mtime(&archive, mtime).unwrap();

    let options = ScanOptions::default().with_save_dir(Some(out.path().to_path_buf()));
    CommentFinder::new(options).find_comments(&[src.path()]);

    let meta = fs::metadata(out.path().join("old-zipcomment.txt")).unwrap();
    assert_eq!(FileTime::from_last_modification_time(&meta), mtime);
}

#[test]
fn test_sauce_trailer_not_exported() {
    let src = tempdir().unwrap();
    let mut comment = b"Greets to all!".to_vec();
    comment.push(0x1A);
    comment.extend_from_slice(b"SAUCE00");
    comment.extend_from_slice(&[b' '; 121]);
    // No COMNT block.
    let record = comment.len() - 128;
    comment[record + 104] = 0;
    write_zip(src.path(), "art.zip", &comment);

    let options = ScanOptions::default().with_export(true);
    CommentFinder::new(options).find_comments(&[src.path()]);

    assert_eq!(
        fs::read_to_string(src.path().join("art-zipcomment.txt")).unwrap(),
        "Greets to all!\n"
    );
}
