//! Structured error handling and exit codes.

use serde::Serialize;

use crate::session::ScanSummary;

/// Exit codes for the zipcmt application.
///
/// - 0: Success (every root was scanned)
/// - 1: General error (unexpected failure, or every root failed)
/// - 2: Partial success (some roots or exports failed)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: The scan completed.
    Success = 0,
    /// General error: An unexpected error occurred or nothing could be scanned.
    GeneralError = 1,
    /// Partial success: The scan completed with some non-fatal errors.
    PartialSuccess = 2,
    /// Interrupted: Scan was interrupted by user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "ZC000",
            Self::GeneralError => "ZC001",
            Self::PartialSuccess => "ZC002",
            Self::Interrupted => "ZC130",
        }
    }

    /// Pick the exit code for a finished scan.
    #[must_use]
    pub fn from_summary(summary: &ScanSummary) -> Self {
        if summary.interrupted {
            Self::Interrupted
        } else if summary.all_roots_failed() {
            Self::GeneralError
        } else if summary.has_failures() {
            Self::PartialSuccess
        } else {
            Self::Success
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "ZC001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}
