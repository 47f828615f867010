//! Comment content deduplication.
//!
//! # Overview
//!
//! A comment is a duplicate when the SHA-256 digest of its trimmed text
//! was already seen during the current scan. Uniqueness is therefore a
//! property of the content, not of the archive: two archives carrying the
//! same note count once, and the first one visited wins.
//!
//! The digest covers whichever form the scan produced (decoded or raw), so
//! a raw comment and its decoded rendition are different content.

use std::collections::HashSet;

use sha2::{Digest as _, Sha256};

use crate::comment::CommentText;

/// A SHA-256 digest of trimmed comment text.
pub type Digest = sha2::digest::Output<Sha256>;

/// Size of one stored digest in bytes.
pub const DIGEST_LEN: usize = 32;

/// Compute the dedup key of a comment.
///
/// Leading and trailing whitespace is ignored; internal whitespace is
/// significant.
#[must_use]
pub fn digest(text: &CommentText) -> Digest {
    Sha256::digest(text.trimmed())
}

/// Set of comment digests seen during one scan.
///
/// Append-only: digests are never removed.
#[derive(Debug, Default)]
pub struct CommentHashes {
    seen: HashSet<Digest>,
}

impl CommentHashes {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the comment, returning true if its content is new.
    pub fn insert(&mut self, text: &CommentText) -> bool {
        self.seen.insert(digest(text))
    }

    /// Number of distinct comments recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Bytes held by the stored digests.
    #[must_use]
    pub fn digest_bytes(&self) -> u64 {
        (self.seen.len() * DIGEST_LEN) as u64
    }
}

/// Decide whether a comment should be counted.
///
/// With `show_all` every comment is accepted and `hashes` is left alone.
/// Otherwise only the first occurrence of each content is accepted.
pub fn admit(text: &CommentText, hashes: &mut CommentHashes, show_all: bool) -> bool {
    if show_all {
        return true;
    }
    let accepted = hashes.insert(text);
    if !accepted {
        log::trace!("Duplicate comment {:x}", digest(text));
    }
    accepted
}
