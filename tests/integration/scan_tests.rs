use crate::common::{sample_tree, write_zip};
use std::fs;
use tempfile::tempdir;
use zipcmt::comment::{read_comment, BlankReason, CommentRead};
use zipcmt::config::ScanOptions;
use zipcmt::scanner::{CommentFinder, Walker, WalkerConfig};

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = CommentFinder::new(ScanOptions::default());

    let summary = finder.find_comments(&[dir.path()]);

    assert_eq!(summary.zips_seen, 0);
    assert_eq!(summary.comments_accepted, 0);
    assert!(!summary.has_failures());
}

#[test]
fn test_scan_unique_comments() {
    let dir = tempdir().unwrap();
    sample_tree(dir.path());

    let summary = CommentFinder::new(ScanOptions::default()).find_comments(&[dir.path()]);

    assert_eq!(summary.zips_seen, 4);
    assert_eq!(summary.comments_accepted, 2);
}

#[test]
fn test_scan_all_comments() {
    let dir = tempdir().unwrap();
    sample_tree(dir.path());

    let options = ScanOptions::default().with_show_all(true);
    let summary = CommentFinder::new(options).find_comments(&[dir.path()]);

    assert_eq!(summary.zips_seen, 4);
    assert_eq!(summary.comments_accepted, 3);
}

#[test]
fn test_scan_ignores_other_files() {
    let dir = tempdir().unwrap();
    write_zip(dir.path(), "a.zip", b"one");
    write_zip(dir.path(), "b.ZIP", b"two");
    fs::write(dir.path().join("notes.txt"), b"not an archive").unwrap();
    fs::write(dir.path().join("zip"), b"no extension").unwrap();
    fs::create_dir(dir.path().join("folder.zip")).unwrap();

    let summary = CommentFinder::new(ScanOptions::default()).find_comments(&[dir.path()]);

    assert_eq!(summary.zips_seen, 2);
    assert_eq!(summary.comments_accepted, 2);
}

#[test]
fn test_scan_without_recursion() {
    let dir = tempdir().unwrap();
    sample_tree(dir.path());

    let options = ScanOptions::default().with_recursive(false);
    let summary = CommentFinder::new(options).find_comments(&[dir.path()]);

    assert_eq!(summary.zips_seen, 2);
    assert_eq!(summary.comments_accepted, 1);
}

#[test]
fn test_walk_order_is_lexical() {
    let dir = tempdir().unwrap();
    write_zip(dir.path(), "b.zip", b"");
    write_zip(dir.path(), "a/z.zip", b"");
    write_zip(dir.path(), "c.zip", b"");

    let walker = Walker::new(dir.path(), WalkerConfig::default());
    let names: Vec<_> = walker
        .walk()
        .map(|entry| entry.unwrap().path.strip_prefix(dir.path()).unwrap().to_path_buf())
        .collect();

    assert_eq!(
        names,
        vec![
            std::path::Path::new("a").join("z.zip"),
            "b.zip".into(),
            "c.zip".into()
        ]
    );
}

#[test]
fn test_whitespace_and_sentinel_comments_are_blank() {
    let dir = tempdir().unwrap();
    let blank = write_zip(dir.path(), "blank.zip", b" \r\n\t ");
    let torrent = write_zip(dir.path(), "t.zip", b"TORRENTZIPPED-12345678");

    assert!(matches!(
        read_comment(&blank, false),
        CommentRead::Blank(BlankReason::Whitespace)
    ));
    assert!(matches!(
        read_comment(&torrent, false),
        CommentRead::Blank(BlankReason::Sentinel)
    ));

    let summary = CommentFinder::new(ScanOptions::default()).find_comments(&[dir.path()]);
    assert_eq!(summary.zips_seen, 2);
    assert_eq!(summary.comments_accepted, 0);
}

#[test]
fn test_duplicates_differ_only_in_surrounding_whitespace() {
    let dir = tempdir().unwrap();
    write_zip(dir.path(), "a.zip", b"Call our BBS!");
    write_zip(dir.path(), "b.zip", b"\r\n  Call our BBS!  \r\n");
    write_zip(dir.path(), "c.zip", b"call our bbs!");

    let summary = CommentFinder::new(ScanOptions::default()).find_comments(&[dir.path()]);

    assert_eq!(summary.comments_accepted, 2);
}

#[test]
fn test_multiple_roots_share_dedup() {
    let one = tempdir().unwrap();
    let two = tempdir().unwrap();
    sample_tree(one.path());
    sample_tree(two.path());

    let finder = CommentFinder::new(ScanOptions::default());
    let summary = finder.find_comments(&[one.path(), two.path()]);

    assert_eq!(summary.roots, 2);
    assert_eq!(summary.zips_seen, 8);
    assert_eq!(summary.comments_accepted, 2);
}
