//! dupescan - concurrent duplicate file scanner.
//!
//! Entry point for the CLI binary.

use clap::Parser;
use dupescan::{cli::Cli, engine, error::ExitCode, logging};

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet);

    let params = cli.to_params();
    match engine::run(&params) {
        Ok(report) => {
            let code = if report.is_empty() {
                ExitCode::NoDuplicates
            } else {
                ExitCode::Success
            };
            std::process::exit(code.as_i32());
        }
        Err(err) => {
            eprintln!("Error: {err:#}");
            std::process::exit(ExitCode::GeneralError.as_i32());
        }
    }
}
