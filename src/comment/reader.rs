//! Archive comment reader.
//!
//! # Overview
//!
//! The comment lives in the end-of-central-directory (EOCD) record at the
//! tail of a ZIP archive. The record is at most `22 + 65535` bytes from the
//! end of the file, so only that window is read; entry data is never
//! touched.
//!
//! A file that cannot be opened, has no EOCD record, or whose EOCD points
//! at a bogus central directory is reported as
//! [`CommentRead::Unreadable`]. It is never an error for the caller: a
//! damaged archive must not stop a scan.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use std::time::SystemTime;

use super::{
    cp437, trailer, trim_blank, ArchiveComment, BlankReason, CommentRead, CommentText, ReadError,
};

/// Comments starting with this marker were written by a deterministic
/// repackaging tool and carry no human text.
pub const SENTINEL_PREFIX: &[u8] = b"TORRENTZIPPED-";

const SIG_EOCD: u32 = 0x0605_4b50;
const SIG_CENTRAL_DIR: u32 = 0x0201_4b50;
const SIG_ZIP64_LOCATOR: u32 = 0x0706_4b50;
const EOCD_LEN: usize = 22;
const ZIP64_LOCATOR_LEN: usize = 20;
const MAX_COMMENT_LEN: usize = u16::MAX as usize;
const SEARCH_WINDOW: usize = EOCD_LEN + MAX_COMMENT_LEN;

/// Fixed fields of the EOCD record that matter here.
#[derive(Debug, Clone, Copy)]
struct EndRecord {
    /// Offset of the record from the start of the window
    offset: usize,
    entries_total: u16,
    cd_size: u32,
    cd_offset: u32,
    comment_len: usize,
}

impl EndRecord {
    fn parse(win: &[u8], offset: usize) -> Self {
        let rec = &win[offset..];
        Self {
            offset,
            entries_total: le_u16(&rec[10..12]),
            cd_size: le_u32(&rec[12..16]),
            cd_offset: le_u32(&rec[16..20]),
            comment_len: usize::from(le_u16(&rec[20..22])),
        }
    }

    fn is_zip64(&self) -> bool {
        self.entries_total == u16::MAX || self.cd_size == u32::MAX || self.cd_offset == u32::MAX
    }

    fn comment<'a>(&self, win: &'a [u8]) -> &'a [u8] {
        let start = self.offset + EOCD_LEN;
        &win[start..start + self.comment_len]
    }
}

/// Read and classify the comment of the archive at `path`.
///
/// With `raw` set the comment bytes are returned untouched. Otherwise a
/// SAUCE trailer is removed and the text is decoded from code page 437.
///
/// # Example
///
/// ```no_run
/// use zipcmt::comment::read_comment;
/// use std::path::Path;
///
/// if let Some(comment) = read_comment(Path::new("demo.zip"), false).into_comment() {
///     println!("{}", comment.text.to_lossy());
/// }
/// ```
#[must_use]
pub fn read_comment(path: &Path, raw: bool) -> CommentRead {
    match read_raw_comment(path) {
        Ok((bytes, modified)) => classify(path, bytes, modified, raw),
        Err(err) => {
            log::debug!("{}", err);
            CommentRead::Unreadable(err)
        }
    }
}

/// Apply the comment rules to the bytes stored in the archive.
fn classify(path: &Path, bytes: Vec<u8>, modified: Option<SystemTime>, raw: bool) -> CommentRead {
    if bytes.is_empty() {
        return CommentRead::Blank(BlankReason::Empty);
    }
    if bytes.starts_with(SENTINEL_PREFIX) {
        log::trace!("Repackaging marker in {}", path.display());
        return CommentRead::Blank(BlankReason::Sentinel);
    }
    if trim_blank(&bytes).is_empty() {
        return CommentRead::Blank(BlankReason::Whitespace);
    }

    let text = if raw {
        CommentText::Raw(bytes)
    } else {
        if trailer::contains(&bytes) {
            log::trace!("Removing SAUCE trailer from {}", path.display());
        }
        let visible = trailer::strip(&bytes);
        let decoded = cp437::decode(visible);
        if decoded.trim().is_empty() {
            return CommentRead::Blank(BlankReason::Whitespace);
        }
        CommentText::Decoded(decoded)
    };

    CommentRead::Found(ArchiveComment {
        path: path.to_path_buf(),
        text,
        modified,
    })
}

/// Read the comment bytes and modification time of the archive at `path`.
///
/// # Errors
///
/// Returns a [`ReadError`] when the file cannot be read or is not a
/// well-formed ZIP archive.
pub fn read_raw_comment(path: &Path) -> Result<(Vec<u8>, Option<SystemTime>), ReadError> {
    let io_err = |source: io::Error| ReadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(io_err)?;
    let metadata = file.metadata().map_err(io_err)?;
    let file_len = metadata.len();
    if file_len < EOCD_LEN as u64 {
        return Err(ReadError::TooShort(path.to_path_buf()));
    }

    // Read the tail window that must contain the EOCD record.
    let win_len = file_len.min(SEARCH_WINDOW as u64) as usize;
    let win_off = file_len - win_len as u64;
    file.seek(SeekFrom::Start(win_off)).map_err(io_err)?;
    let mut win = vec![0u8; win_len];
    file.read_exact(&mut win).map_err(io_err)?;

    let record = find_end_record(&win)
        .map(|offset| EndRecord::parse(&win, offset))
        .ok_or_else(|| ReadError::MissingEndRecord(path.to_path_buf()))?;

    let record_pos = win_off + record.offset as u64;
    if !central_directory_ok(&mut file, &win, &record, record_pos).map_err(io_err)? {
        return Err(ReadError::CentralDirectory(path.to_path_buf()));
    }

    Ok((record.comment(&win).to_vec(), metadata.modified().ok()))
}

/// Find the last EOCD signature whose declared comment fits in the window.
fn find_end_record(win: &[u8]) -> Option<usize> {
    let last = win.len().checked_sub(EOCD_LEN)?;
    (0..=last).rev().find(|&i| {
        le_u32(&win[i..i + 4]) == SIG_EOCD
            && i + EOCD_LEN + usize::from(le_u16(&win[i + 20..i + 22])) <= win.len()
    })
}

/// Check that the EOCD record describes a plausible central directory.
///
/// The directory is first looked for where it would end right at the EOCD
/// record, which also holds for archives with data prepended
/// (self-extractors). Failing that, the offset declared in the record is
/// tried, for archives with bytes between the directory and the record.
fn central_directory_ok(
    file: &mut File,
    win: &[u8],
    record: &EndRecord,
    record_pos: u64,
) -> io::Result<bool> {
    if record.is_zip64() {
        // The real values live in the Zip64 record; only require its locator.
        return Ok(record.offset >= ZIP64_LOCATOR_LEN
            && le_u32(&win[record.offset - ZIP64_LOCATOR_LEN..]) == SIG_ZIP64_LOCATOR);
    }

    let cd_size = u64::from(record.cd_size);
    if cd_size > record_pos || u64::from(record.cd_offset) + cd_size > record_pos {
        return Ok(false);
    }
    if record.entries_total == 0 {
        return Ok(true);
    }

    let expected = record_pos - cd_size;
    if signature_at(file, expected)? == SIG_CENTRAL_DIR {
        return Ok(true);
    }
    let declared = u64::from(record.cd_offset);
    Ok(declared != expected && signature_at(file, declared)? == SIG_CENTRAL_DIR)
}

fn signature_at(file: &mut File, pos: u64) -> io::Result<u32> {
    let mut sig = [0u8; 4];
    file.seek(SeekFrom::Start(pos))?;
    file.read_exact(&mut sig)?;
    Ok(u32::from_le_bytes(sig))
}

#[inline(always)]
fn le_u16(b: &[u8]) -> u16 {
    u16::from_le_bytes([b[0], b[1]])
}

#[inline(always)]
fn le_u32(b: &[u8]) -> u32 {
    u32::from_le_bytes([b[0], b[1], b[2], b[3]])
}
