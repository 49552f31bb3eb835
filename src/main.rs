//! dupsweep - Duplicate File Finder
//!
//! Entry point for the dupsweep CLI application.

use clap::Parser;
use dupsweep::{cli::Cli, error::ExitCode, logging::init_logging};

fn main() {
    let args = dupsweep::cli::normalize_legacy_args(std::env::args_os());
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            // --help output is printed on stdout and is not a failure.
            let exit_code = if err.use_stderr() {
                ExitCode::Usage
            } else {
                ExitCode::Success
            };
            let _ = err.print();
            std::process::exit(exit_code.as_i32());
        }
    };

    init_logging(cli.verbose, cli.quiet);

    match dupsweep::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = ExitCode::GeneralError;
            eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
            std::process::exit(exit_code.as_i32());
        }
    }
}
