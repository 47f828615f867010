//! zipcmt - batch viewer and extractor of ZIP archive comments
//!
//! Walks directory trees for `.zip` archives, reads the comment stored in
//! each archive's end of central directory record, prints it and optionally
//! saves it as a text file, skipping comments already seen in the scan.

pub mod cli;
pub mod comment;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod export;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod session;
pub mod signal;

use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::Context;

use crate::cli::Cli;
use crate::config::ScanOptions;
use crate::error::ExitCode;
use crate::output::{status_line, ConsoleObserver};
use crate::scanner::{CommentFinder, FinderError};

/// Run one scan as described by `cli`.
///
/// # Errors
///
/// Returns an error when the log file or the signal handler cannot be set
/// up, when the summary cannot be serialized, and
/// [`FinderError::Interrupted`] when the scan was cancelled.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    let log_file = if cli.log {
        let file = logging::create_log_file(&cli.log_header())
            .context("Failed to set up the log file")?;
        Some(file)
    } else {
        None
    };
    let log_path = log_file.as_ref().map(|f| f.path.clone());
    logging::init_logging(cli.verbose, cli.quiet, log_file);
    log::debug!(
        "zipcmt {} starting, log level {}",
        env!("CARGO_PKG_VERSION"),
        logging::current_level_name()
    );
    if let Some(path) = &log_path {
        log::info!("Logging to {}", path.display());
    }

    if cli.no_color || !std::io::stdout().is_terminal() {
        yansi::disable();
    }

    let handler = signal::install_handler()?;
    let options = ScanOptions::from(&cli);
    let observer = ConsoleObserver::new(&options).with_log_file(log_path.is_some());
    let finder = CommentFinder::new(options)
        .with_shutdown_flag(handler.flag())
        .with_observer(Arc::new(observer));

    let summary = finder.find_comments(&cli.paths);

    if cli.json {
        let json = serde_json::to_string_pretty(&summary)
            .context("Failed to serialize the scan summary")?;
        println!("{json}");
    } else if !finder.options().quiet {
        if finder.options().print {
            println!();
        }
        println!(
            "{}",
            status_line(&summary, finder.options(), yansi::is_enabled())
        );
    }
    if let Some(path) = &log_path {
        if !finder.options().quiet {
            println!("Log saved to {}", path.display());
        }
    }

    if summary.interrupted {
        return Err(FinderError::Interrupted.into());
    }
    Ok(ExitCode::from_summary(&summary))
}
