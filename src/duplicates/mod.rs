//! Duplicate comment detection.
//!
//! This module provides functionality for:
//! - Hashing trimmed comment text with SHA-256
//! - Tracking which comment contents were already counted in a scan

pub mod filter;

pub use filter::{admit, digest, CommentHashes, Digest};
