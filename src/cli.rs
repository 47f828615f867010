//! Command-line interface definitions for zipcmt.
//!
//! This module defines all CLI arguments using the clap derive API.
//!
//! # Example
//!
//! ```bash
//! # Count the unique comments in a collection
//! zipcmt ~/Downloads
//!
//! # Print every comment, duplicates included
//! zipcmt --all --print ~/Downloads
//!
//! # Collect unique comments into one directory
//! zipcmt --save ~/comments ~/Downloads /mnt/archive
//!
//! # Verbose mode for debugging
//! zipcmt -v ~/Downloads
//! ```

use clap::Parser;
use std::path::PathBuf;

/// Batch viewer and extractor of zip archive comments.
///
/// zipcmt walks the given directories for zip archives and reads the
/// comment stored in each one. Identical comments are counted once
/// unless --all is given.
#[derive(Debug, Parser)]
#[command(name = "zipcmt")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directories or zip archives to scan
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Show all comments, including duplicates found in multiple archives
    #[arg(short, long)]
    pub all: bool,

    /// Print the comments to stdout
    #[arg(short, long)]
    pub print: bool,

    /// Save the comments as text files stored alongside each archive
    #[arg(short, long)]
    pub export: bool,

    /// Save the comments to uniquely named text files in this directory
    #[arg(short = 'd', long, value_name = "DIR")]
    pub save: Option<PathBuf>,

    /// Overwrite any previously exported comment text files
    #[arg(short, long)]
    pub overwrite: bool,

    /// Do not use the archive's modification time for exported text files
    #[arg(short, long)]
    pub now: bool,

    /// Do not scan subdirectories
    #[arg(long)]
    pub nowalk: bool,

    /// Keep the original comment encoding (CP437, ISO-8859, ...) instead of Unicode
    #[arg(short, long)]
    pub raw: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Also write a debug log file
    #[arg(long)]
    pub log: bool,

    /// Print the scan summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Report fatal errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,
}

impl Cli {
    /// Configuration lines for the log file header.
    #[must_use]
    pub fn log_header(&self) -> Vec<(&'static str, String)> {
        let dirs = self
            .paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let save = self
            .save
            .as_ref()
            .map_or_else(String::new, |p| p.display().to_string());

        vec![
            ("paths", dirs),
            ("save", save),
            ("all", self.all.to_string()),
            ("export", self.export.to_string()),
            ("overwrite", self.overwrite.to_string()),
            ("now", self.now.to_string()),
            ("nowalk", self.nowalk.to_string()),
            ("raw", self.raw.to_string()),
            ("print", self.print.to_string()),
            ("quiet", self.quiet.to_string()),
        ]
    }
}
