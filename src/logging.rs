//! Logging infrastructure for zipcmt.
//!
//! This module provides logging using the `log` facade and `env_logger` backend.
//! Log levels are determined by (in priority order):
//!
//! 1. `RUST_LOG` environment variable (if set)
//! 2. CLI flags: `--quiet` (error only) or `--verbose` (debug/trace)
//! 3. Default: info level
//!
//! With `--log` the records go to a file instead of stderr, at debug level
//! or finer, below a header describing the run.
//!
//! # Build-specific Formatting
//!
//! - **Debug builds**: Include timestamp, level, and module path for detailed debugging
//! - **Release builds**: Compact format with level and message only for cleaner output
//!
//! # Example
//!
//! ```rust,no_run
//! use zipcmt::logging::init_logging;
//!
//! // Initialize with default (info) level
//! init_logging(0, false, None);
//!
//! log::info!("Application started");
//! ```

use std::env;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use directories::ProjectDirs;
use env_logger::{Builder, Target, WriteStyle};
use log::LevelFilter;

/// A log file opened by [`create_log_file`].
#[derive(Debug)]
pub struct LogFile {
    /// Where the file lives
    pub path: PathBuf,
    file: File,
}

/// Errors opening the log file.
#[derive(thiserror::Error, Debug)]
pub enum LogFileError {
    /// No platform data directory is known.
    #[error("Failed to determine the log directory")]
    NoDataDir,

    /// The file or its directory could not be created or written.
    #[error("Failed to create log file {path}: {source}")]
    Io {
        /// Path of the log file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Initialize the logging subsystem based on CLI verbosity flags.
///
/// Call once at startup. A second call leaves the first logger in place.
///
/// # Priority
///
/// 1. If `RUST_LOG` environment variable is set, it takes precedence
/// 2. If `quiet` is true: Error level only
/// 3. If `verbose >= 2`: Trace level
/// 4. If `verbose == 1`: Debug level
/// 5. Default: Info level
///
/// A `log_file` raises the level to at least debug.
pub fn init_logging(verbose: u8, quiet: bool, log_file: Option<LogFile>) {
    let use_env = env::var("RUST_LOG").is_ok();
    let to_file = log_file.is_some();

    let mut builder = Builder::new();
    let level = if to_file {
        determine_level(verbose.max(1), false)
    } else {
        determine_level(verbose, quiet)
    };

    if use_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(level);
    }

    configure_format(&mut builder, verbose);

    if let Some(log_file) = log_file {
        builder
            .target(Target::Pipe(Box::new(log_file.file)))
            .write_style(WriteStyle::Never);
    }

    if builder.try_init().is_err() {
        log::debug!("Logger already initialized");
        return;
    }

    if use_env {
        log::debug!(
            "Logging initialized from RUST_LOG environment variable: {:?}",
            env::var("RUST_LOG").ok()
        );
    } else {
        log::debug!("Logging initialized at level: {:?}", level);
    }
}

/// Determine the log level from CLI flags.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Configure the log format based on build type and verbosity.
///
/// - Debug builds: timestamp, level, module path from -v up
/// - Release builds: compact format (level + message only)
fn configure_format(builder: &mut Builder, verbose: u8) {
    #[cfg(debug_assertions)]
    {
        builder.format(move |buf, record| {
            let timestamp = buf.timestamp_seconds();
            let level = record.level();
            let level_style = buf.default_level_style(level);

            if verbose >= 1 {
                writeln!(
                    buf,
                    "{} {level_style}{:<5}{level_style:#} [{}] {}",
                    timestamp,
                    level,
                    record.module_path().unwrap_or("unknown"),
                    record.args()
                )
            } else {
                writeln!(
                    buf,
                    "{} {level_style}{:<5}{level_style:#} {}",
                    timestamp,
                    level,
                    record.args()
                )
            }
        });
    }

    #[cfg(not(debug_assertions))]
    {
        let _ = verbose;
        builder.format(|buf, record| {
            let level = record.level();
            let level_style = buf.default_level_style(level);
            writeln!(
                buf,
                "{level_style}{:<5}{level_style:#} {}",
                level,
                record.args()
            )
        });
    }
}

/// Get the current log level as a string.
pub fn current_level_name() -> &'static str {
    match log::max_level() {
        LevelFilter::Off => "off",
        LevelFilter::Error => "error",
        LevelFilter::Warn => "warn",
        LevelFilter::Info => "info",
        LevelFilter::Debug => "debug",
        LevelFilter::Trace => "trace",
    }
}

/// Default directory for log files.
///
/// # Errors
///
/// Returns [`LogFileError::NoDataDir`] when the platform has no data directory.
pub fn log_dir() -> Result<PathBuf, LogFileError> {
    let project_dirs =
        ProjectDirs::from("com", "zipcmt", "zipcmt").ok_or(LogFileError::NoDataDir)?;
    Ok(project_dirs.data_local_dir().join("logs"))
}

/// Create a timestamped log file in [`log_dir`] and write `header` to it.
///
/// # Errors
///
/// Returns [`LogFileError`] when the file cannot be created.
pub fn create_log_file(header: &[(&str, String)]) -> Result<LogFile, LogFileError> {
    create_log_file_in(&log_dir()?, header)
}

/// Create a timestamped log file in `dir` and write `header` to it.
///
/// # Errors
///
/// Returns [`LogFileError::Io`] when the file cannot be created.
pub fn create_log_file_in(dir: &Path, header: &[(&str, String)]) -> Result<LogFile, LogFileError> {
    let name = format!("{}.log", Local::now().format("%Y%m%d%H%M%S"));
    let path = dir.join(name);
    let io_err = |source| LogFileError::Io {
        path: path.clone(),
        source,
    };

    fs::create_dir_all(dir).map_err(io_err)?;
    let mut file = File::create(&path).map_err(io_err)?;
    write_header(&mut file, header).map_err(io_err)?;

    Ok(LogFile { path, file })
}

/// Write the run configuration as aligned `label: value` lines.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn write_header<W: Write>(out: &mut W, header: &[(&str, String)]) -> io::Result<()> {
    let width = header.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    writeln!(
        out,
        "zipcmt {} log, {}",
        env!("CARGO_PKG_VERSION"),
        Local::now().to_rfc2822()
    )?;
    for (label, value) in header {
        writeln!(out, "{label:>width$}: {value}")?;
    }
    writeln!(out)
}
