//! zipcmt - ZIP archive comment scanner
//!
//! Entry point for the zipcmt CLI application.

use clap::Parser;
use zipcmt::{
    cli::Cli,
    error::{ExitCode, StructuredError},
    scanner::FinderError,
};

fn main() {
    // Argument errors exit with 1 rather than clap's 2, which means partial success here.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            let code = if err.use_stderr() {
                ExitCode::GeneralError.as_i32()
            } else {
                ExitCode::Success.as_i32()
            };
            std::process::exit(code);
        }
    };
    let json_errors = cli.json_errors;

    match zipcmt::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = if err
                .downcast_ref::<FinderError>()
                .is_some_and(|e| matches!(e, FinderError::Interrupted))
            {
                ExitCode::Interrupted
            } else {
                ExitCode::GeneralError
            };

            if json_errors {
                match serde_json::to_string_pretty(&StructuredError::new(&err, exit_code)) {
                    Ok(json) => eprintln!("{json}"),
                    Err(_) => eprintln!("[{}] Error: {err:#}", exit_code.code_prefix()),
                }
            } else {
                eprintln!("[{}] Error: {err:#}", exit_code.code_prefix());
            }

            std::process::exit(exit_code.as_i32());
        }
    }
}
