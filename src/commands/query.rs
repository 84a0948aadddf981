//! Command: render packages with a format string.
use std::io::{self, BufRead, Write};

use anyhow::{Context as _, Result};
use tracing::{debug, warn};

use crate::cli::Cli;
use crate::config::Config;
use crate::db::{self, Database};
use crate::format::{RenderCounter, RenderSettings, render};
use crate::package::Corpus;

/// Target that stands for "read targets from stdin".
const STDIN_TARGET: &str = "-";

/// Resolve packages per `cli` and write one rendered record each to `out`.
///
/// Returns `true` when at least one package was rendered and every record
/// produced output.
///
/// # Errors
///
/// Returns an error if the format string is missing, stdin cannot be read,
/// configuration or the local database cannot be loaded, or writing fails.
pub fn execute(cli: &Cli, stdin: impl BufRead, out: &mut impl Write) -> Result<bool> {
    let format = cli.format.as_deref().context("missing format string")?;
    let targets = expand_targets(&cli.targets, stdin).context("reading targets from stdin")?;
    let corpus = cli.corpus.corpus();

    let databases = load_databases(cli, corpus, &targets)?;
    let packages = if corpus == Corpus::File {
        databases.iter().flat_map(|db| &db.packages).collect()
    } else {
        db::resolve_targets(&databases, &targets, cli.readone)
    };
    debug!("rendering {} packages", packages.len());

    if packages.is_empty() {
        return Ok(false);
    }

    let settings = RenderSettings {
        time_format: cli.time_format.clone(),
        size_format: cli.size_format,
        verbose: cli.verbose,
        corpus,
        ..RenderSettings::with_raw_delimiters(&cli.delim, &cli.list_delim)
    };
    let mut counter = RenderCounter::starting_at(cli.counter_start);

    let mut all_written = true;
    for pkg in packages {
        let rendered = render(format, pkg, &settings, &mut counter);
        out.write_all(rendered.text.as_bytes())
            .context("writing output")?;
        all_written &= rendered.written > 0;
    }
    Ok(all_written)
}

/// Replace any `-` target with whitespace-separated targets read from
/// `stdin`.
///
/// # Errors
///
/// Returns an error if stdin cannot be read.
pub fn expand_targets(targets: &[String], mut stdin: impl BufRead) -> io::Result<Vec<String>> {
    if !targets.iter().any(|t| t == STDIN_TARGET) {
        return Ok(targets.to_vec());
    }

    let mut input = String::new();
    stdin.read_to_string(&mut input)?;

    let mut expanded = Vec::new();
    for target in targets {
        if target == STDIN_TARGET {
            expanded.extend(input.split_whitespace().map(str::to_string));
        } else {
            expanded.push(target.clone());
        }
    }
    Ok(expanded)
}

fn load_databases(cli: &Cli, corpus: Corpus, targets: &[String]) -> Result<Vec<Database>> {
    if corpus == Corpus::File {
        return Ok(vec![db::file::open(targets)]);
    }

    let config = Config::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    let paths = config.resolve_paths(cli.root.as_deref(), cli.dbpath.as_deref());
    debug!(
        "root {} database {}",
        paths.root.display(),
        paths.db_path.display()
    );

    if corpus == Corpus::Local {
        let local = db::local::open(&paths.db_path, &paths.root)
            .context("loading the local database")?;
        return Ok(vec![local]);
    }

    let mut databases = Vec::with_capacity(config.repos.len());
    for repo in &config.repos {
        match db::sync::open(&paths.db_path, repo) {
            Ok(database) => databases.push(database),
            Err(e) => warn!("{e}"),
        }
    }
    Ok(databases)
}
