//! Scan configuration.
//!
//! [`ScanOptions`] is the only configuration a scan takes. The CLI builds it
//! from its flags; library users build it with the `with_*` methods.
//!
//! The save directory is checked once, before any archive is visited, by
//! [`resolve_save_dir`].

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use directories::BaseDirs;

use crate::cli::Cli;

/// Options for one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Count every comment, including duplicates.
    pub show_all_duplicates: bool,
    /// Save each comment next to its archive.
    pub export_alongside: bool,
    /// Save each comment into this directory under a unique name.
    pub save_dir: Option<PathBuf>,
    /// Replace existing text files.
    pub overwrite: bool,
    /// Keep the comment's original encoding.
    pub raw: bool,
    /// Leave exported files with the current time instead of the archive's.
    pub now: bool,
    /// Print comments to stdout.
    pub print: bool,
    /// Suppress progress and summary output.
    pub quiet: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            show_all_duplicates: false,
            export_alongside: false,
            save_dir: None,
            overwrite: false,
            raw: false,
            now: false,
            print: false,
            quiet: false,
        }
    }
}

impl ScanOptions {
    /// Options with defaults: recursive, deduplicated, no exports.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether subdirectories are scanned.
    #[must_use]
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Set whether duplicate comments are counted.
    #[must_use]
    pub fn with_show_all(mut self, show_all: bool) -> Self {
        self.show_all_duplicates = show_all;
        self
    }

    /// Set whether comments are saved alongside their archives.
    #[must_use]
    pub fn with_export(mut self, export: bool) -> Self {
        self.export_alongside = export;
        self
    }

    /// Set the directory comments are collected into.
    #[must_use]
    pub fn with_save_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.save_dir = dir;
        self
    }

    /// Set whether existing text files are replaced.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Set whether comments keep their original encoding.
    #[must_use]
    pub fn with_raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }

    /// Set whether exported files keep the current time.
    #[must_use]
    pub fn with_now(mut self, now: bool) -> Self {
        self.now = now;
        self
    }

    /// Set whether comments are printed.
    #[must_use]
    pub fn with_print(mut self, print: bool) -> Self {
        self.print = print;
        self
    }

    /// Set quiet mode.
    #[must_use]
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }
}

impl From<&Cli> for ScanOptions {
    fn from(cli: &Cli) -> Self {
        Self {
            recursive: !cli.nowalk,
            show_all_duplicates: cli.all,
            export_alongside: cli.export,
            save_dir: cli.save.clone(),
            overwrite: cli.overwrite,
            raw: cli.raw,
            now: cli.now,
            print: cli.print,
            quiet: cli.quiet,
        }
    }
}

/// Errors in the save directory setting.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The directory does not exist.
    #[error("{0}: export directory cannot be found")]
    Missing(PathBuf),

    /// The path names a file.
    #[error("{0}: export directory is a file")]
    IsFile(PathBuf),

    /// The directory cannot be accessed.
    #[error("{0}: export directory access is blocked due to its permissions")]
    Permission(PathBuf),

    /// The operating system rejects the path.
    #[error("{0}: the operating system reports this export directory is invalid")]
    Invalid(PathBuf),

    /// Any other failure to inspect the directory.
    #[error("{path}: export directory error: {source}")]
    Io {
        /// The resolved directory path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// `~` was used but no home directory is known.
    #[error("{0}: export directory uses ~ but the home directory is unknown")]
    NoHome(PathBuf),
}

/// Lexically clean a path.
///
/// Repeated separators and `.` elements are dropped and `..` removes the
/// element before it where there is one. No filesystem access is made.
///
/// ```
/// use zipcmt::config::clean_path;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(clean_path(Path::new("..//test///.")), PathBuf::from("../test"));
/// ```
#[must_use]
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Replace a leading `~` element with `home`.
fn expand_home(path: &Path, home: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => {
            let home = home.ok_or_else(|| ConfigError::NoHome(path.to_path_buf()))?;
            Ok(home.join(components.as_path()))
        }
        _ => Ok(path.to_path_buf()),
    }
}

/// Clean, expand and check a save directory.
///
/// # Errors
///
/// Returns a [`ConfigError`] when the directory is missing, is a file or
/// cannot be accessed.
pub fn resolve_save_dir(dir: &Path) -> Result<PathBuf, ConfigError> {
    let base_dirs = BaseDirs::new();
    let home = base_dirs.as_ref().map(BaseDirs::home_dir);
    let path = expand_home(&clean_path(dir), home)?;

    let metadata = fs::metadata(&path).map_err(|e| io_config_error(&path, e))?;
    if !metadata.is_dir() {
        return Err(ConfigError::IsFile(path));
    }
    fs::read_dir(&path).map_err(|e| io_config_error(&path, e))?;

    log::debug!("Save directory: {}", path.display());
    Ok(path)
}

fn io_config_error(path: &Path, error: std::io::Error) -> ConfigError {
    let path = path.to_path_buf();
    match error.kind() {
        ErrorKind::NotFound => ConfigError::Missing(path),
        ErrorKind::PermissionDenied => ConfigError::Permission(path),
        ErrorKind::InvalidInput => ConfigError::Invalid(path),
        _ => ConfigError::Io {
            path,
            source: error,
        },
    }
}
