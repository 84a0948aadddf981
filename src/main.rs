//! Command-line entry point for `pkgfmt`.

use std::process::ExitCode;

use clap::Parser as _;
use tracing::error;

use pkgfmt::{cli, commands, logging};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    logging::init_subscriber(args.verbose);

    match commands::run(&args) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
