//! SAUCE trailer detection and removal.
//!
//! Some DOS-era archivers and text editors append a 128 byte SAUCE record
//! to the end of the text they write, optionally preceded by a `COMNT`
//! block of 64 byte lines and a `0x1A` end-of-file marker. None of it is
//! part of the visible comment, so it is stripped before decoding.
//!
//! Record layout (only the fields used here):
//!
//! | offset | length | field                      |
//! |--------|--------|----------------------------|
//! | 0      | 7      | `SAUCE00` id and version   |
//! | 104    | 1      | number of comment lines    |

/// Length of the fixed SAUCE record.
pub const RECORD_LEN: usize = 128;

const SAUCE_ID: &[u8] = b"SAUCE00";
const COMNT_ID: &[u8] = b"COMNT";
const COMMENT_LINE_LEN: usize = 64;
const COMMENT_LINES_OFFSET: usize = 104;
const EOF_MARKER: u8 = 0x1A;

/// Offset of the SAUCE record when `data` ends with one.
fn record_start(data: &[u8]) -> Option<usize> {
    let start = data.len().checked_sub(RECORD_LEN)?;
    data[start..].starts_with(SAUCE_ID).then_some(start)
}

/// Returns true when `data` ends with a SAUCE record.
#[must_use]
pub fn contains(data: &[u8]) -> bool {
    record_start(data).is_some()
}

/// Strip a trailing SAUCE record, its comment block and the EOF marker.
///
/// Data without a record is returned unchanged.
///
/// # Example
///
/// ```
/// use zipcmt::comment::trailer::strip;
///
/// assert_eq!(strip(b"plain text"), b"plain text");
/// ```
#[must_use]
pub fn strip(data: &[u8]) -> &[u8] {
    let Some(mut end) = record_start(data) else {
        return data;
    };

    let lines = usize::from(data[end + COMMENT_LINES_OFFSET]);
    if lines > 0 {
        let block_len = COMNT_ID.len() + lines * COMMENT_LINE_LEN;
        if let Some(block_start) = end.checked_sub(block_len) {
            if data[block_start..].starts_with(COMNT_ID) {
                end = block_start;
            }
        }
    }

    if end > 0 && data[end - 1] == EOF_MARKER {
        end -= 1;
    }

    &data[..end]
}
