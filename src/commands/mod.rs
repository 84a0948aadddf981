//! Top-level command orchestration.

pub mod completions;
pub mod query;

use std::io::{self, BufWriter, Write as _};
use std::process::ExitCode;

use anyhow::Result;

use crate::cli::Cli;

/// Run the command selected by `cli` against the process's stdin and
/// stdout.
///
/// # Errors
///
/// Returns an error if configuration or a database cannot be loaded, or if
/// writing the output fails.
pub fn run(cli: &Cli) -> Result<ExitCode> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if let Some(shell) = cli.completions {
        completions::run(shell, &mut out);
        out.flush()?;
        return Ok(ExitCode::SUCCESS);
    }

    let ok = query::execute(cli, io::stdin().lock(), &mut out)?;
    out.flush()?;
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
