//! Terminal output: comment separators, the summary line and the console
//! observer that prints comments as they are found.

use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use bytesize::ByteSize;
use directories::BaseDirs;
use yansi::Paint;

use crate::comment::ArchiveComment;
use crate::config::ScanOptions;
use crate::progress::{Progress, ScanObserver};
use crate::scanner::ArchiveEntry;
use crate::session::ScanSummary;

/// Column where the separator's closing corner sits.
pub const SEPARATOR_WIDTH: usize = 45;

const POINTER: &str = " \u{2500}\u{2500} ";
const RESET: &str = "\x1b[0m";

/// Separator printed above a comment.
///
/// A short path is padded with a rule to [`SEPARATOR_WIDTH`] columns and
/// closed with a corner; a long one is printed after the pointer alone.
/// A path inside `home` is shown with a leading `~`.
///
/// ```
/// use std::path::Path;
/// use zipcmt::output::separator;
///
/// let line = separator(Path::new("/home/al/files/a.zip"), Some(Path::new("/home/al")));
/// assert!(line.starts_with("\n \u{2500}\u{2500} ~/files/a.zip \u{2500}"));
/// assert!(line.ends_with("\u{2510}\n"));
/// ```
#[must_use]
pub fn separator(path: &Path, home: Option<&Path>) -> String {
    let name = display_name(path, home);
    let used = POINTER.chars().count() + name.chars().count();
    if used >= SEPARATOR_WIDTH {
        return format!("{POINTER}{name}\n");
    }
    format!(
        "\n{POINTER}{name} {}\u{2510}\n",
        "\u{2500}".repeat(SEPARATOR_WIDTH - used)
    )
}

fn display_name(path: &Path, home: Option<&Path>) -> String {
    if let Some(rest) = home.and_then(|h| path.strip_prefix(h).ok()) {
        if !rest.as_os_str().is_empty() {
            return format!("~{MAIN_SEPARATOR}{}", rest.display());
        }
    }
    path.display().to_string()
}

/// One-line report of a finished scan.
///
/// `paint` colors the counts; the text is the same either way.
#[must_use]
pub fn status_line(summary: &ScanSummary, options: &ScanOptions, paint: bool) -> String {
    let plural = |n: u64| if n == 1 { "" } else { "s" };
    let unique = if options.show_all_duplicates {
        ""
    } else {
        "unique "
    };
    let value = |text: String| {
        if paint {
            text.bold().to_string()
        } else {
            text
        }
    };

    let mut line = format!(
        "Scanned {}",
        value(format!(
            "{} zip archive{}",
            summary.zips_seen,
            plural(summary.zips_seen)
        ))
    );
    if options.save_dir.is_some() && summary.saved != summary.comments_accepted {
        line.push_str(&format!(
            ", saved {}",
            value(format!("{} text files", summary.saved))
        ));
    }
    line.push_str(&format!(
        " and found {}, taking {}",
        value(format!(
            "{} {unique}comment{}",
            summary.comments_accepted,
            plural(summary.comments_accepted)
        )),
        value(format!("{:.2?}", summary.elapsed))
    ));
    line
}

/// Write one `error:` line for `error`.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn write_error<W: Write>(out: &mut W, error: &dyn std::error::Error) -> io::Result<()> {
    writeln!(out, "{} {error}", "error:".red().bold())
}

/// Observer that prints comments, tips and errors to the terminal.
pub struct ConsoleObserver {
    print: bool,
    quiet: bool,
    log_to_file: bool,
    home: Option<PathBuf>,
    progress: Progress,
}

impl ConsoleObserver {
    /// Observer for a scan run with `options`.
    ///
    /// The spinner is shown only when comments are not printed, output is
    /// not quiet and stderr is a terminal.
    #[must_use]
    pub fn new(options: &ScanOptions) -> Self {
        let hidden = options.print || options.quiet || !io::stderr().is_terminal();
        Self {
            print: options.print && !options.quiet,
            quiet: options.quiet,
            log_to_file: false,
            home: BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf()),
            progress: Progress::new(hidden),
        }
    }

    /// Note that log records go to a file rather than stderr.
    #[must_use]
    pub fn with_log_file(mut self, log_to_file: bool) -> Self {
        self.log_to_file = log_to_file;
        self
    }

    /// Whether errors are printed here rather than left to the warning log.
    ///
    /// True in quiet mode, where warnings are filtered out, and when log
    /// records go to a file.
    #[must_use]
    pub fn reports_errors(&self) -> bool {
        self.quiet || self.log_to_file
    }

    fn print_comment(&self, comment: &ArchiveComment) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(separator(&comment.path, self.home.as_deref()).as_bytes())?;
        out.write_all(comment.text.as_bytes())?;
        writeln!(out, "{RESET}")?;
        out.flush()
    }
}

impl ScanObserver for ConsoleObserver {
    fn on_archive(&self, archive: &ArchiveEntry, seen: u64) {
        self.progress.on_archive(archive, seen);
    }

    fn on_comment(&self, comment: &ArchiveComment) {
        if !self.print {
            return;
        }
        if let Err(err) = self.progress.suspend(|| self.print_comment(comment)) {
            log::debug!("Failed to print comment: {err}");
        }
    }

    fn on_skipped(&self, path: &Path, size: u64) {
        if self.quiet {
            return;
        }
        self.progress.suspend(|| {
            eprintln!(
                "{} export skipped, file already exists: {} ({})",
                "info:".cyan().bold(),
                path.display(),
                ByteSize::b(size)
            );
        });
    }

    fn on_error(&self, error: &dyn std::error::Error) {
        if !self.reports_errors() {
            return;
        }
        let written = self
            .progress
            .suspend(|| write_error(&mut io::stderr().lock(), error));
        if let Err(err) = written {
            log::debug!("Failed to print error: {err}");
        }
    }

    fn on_finish(&self, summary: &ScanSummary) {
        self.progress.on_finish(summary);
    }
}
