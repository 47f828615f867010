//! ZIP fixtures shared by the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Append little-endian fields to `out`.
fn put(out: &mut Vec<u8>, fields: &[u32], widths: &[usize]) {
    for (value, width) in fields.iter().zip(widths) {
        out.extend_from_slice(&value.to_le_bytes()[..*width]);
    }
}

/// A stored archive holding one empty `readme.txt`, with `comment` in the
/// end of central directory record.
pub fn zip_with_comment(comment: &[u8]) -> Vec<u8> {
    let name = b"readme.txt";
    let name_len = name.len() as u32;
    let mut out = Vec::new();

    // signature, version, flags, method, time, date, crc, sizes, name, extra
    put(
        &mut out,
        &[0x0403_4b50, 20, 0, 0, 0, 0x21, 0, 0, 0, name_len, 0],
        &[4, 2, 2, 2, 2, 2, 4, 4, 4, 2, 2],
    );
    out.extend_from_slice(name);

    let cd_offset = out.len() as u32;
    put(
        &mut out,
        &[
            0x0201_4b50, 20, 20, 0, 0, 0, 0x21, 0, 0, 0, name_len, 0, 0, 0, 0, 0, 0,
        ],
        &[4, 2, 2, 2, 2, 2, 2, 4, 4, 4, 2, 2, 2, 2, 2, 4, 4],
    );
    out.extend_from_slice(name);
    let cd_size = out.len() as u32 - cd_offset;

    put(
        &mut out,
        &[0x0605_4b50, 0, 0, 1, 1, cd_size, cd_offset, comment.len() as u32],
        &[4, 2, 2, 2, 2, 4, 4, 2],
    );
    out.extend_from_slice(comment);
    out
}

/// Write an archive with `comment` to `dir/name`, creating parent folders.
pub fn write_zip(dir: &Path, name: &str, comment: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, zip_with_comment(comment)).unwrap();
    path
}

/// Two "hello" archives, one "world" and one without a comment.
pub fn sample_tree(dir: &Path) {
    write_zip(dir, "a.zip", b"hello");
    write_zip(dir, "d.zip", b"");
    write_zip(dir, "sub/b.zip", b"hello");
    write_zip(dir, "sub/c.zip", b"world");
}
