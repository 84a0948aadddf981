//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser};
use clap_complete::Shell;

use crate::config::DEFAULT_CONFIG_PATH;
use crate::format::size::SizeFormat;
use crate::format::{DEFAULT_DELIM, DEFAULT_LIST_DELIM, time::DEFAULT_TIME_FORMAT};
use crate::package::Corpus;

/// Version string embedded at build time, falling back to the crate version.
pub const VERSION: &str = match option_env!("PKGFMT_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};

/// Print package metadata using printf-style format strings.
#[derive(Parser, Debug)]
#[command(name = "pkgfmt", version = VERSION)]
pub struct Cli {
    /// Format string, e.g. '%n %v'
    #[arg(required_unless_present = "completions")]
    pub format: Option<String>,

    /// Packages to query (`repo/name` restricts to one repository, `-`
    /// reads targets from stdin)
    pub targets: Vec<String>,

    /// Which packages to query
    #[command(flatten)]
    pub corpus: CorpusOpts,

    /// Return only the first match for each target
    #[arg(short = '1', long)]
    pub readone: bool,

    /// Delimiter printed after each package
    #[arg(short, long, default_value = DEFAULT_DELIM, hide_default_value = true)]
    pub delim: String,

    /// Delimiter printed between list items
    #[arg(short, long = "listdelim", default_value = DEFAULT_LIST_DELIM, hide_default_value = true)]
    pub list_delim: String,

    /// strftime format for dates
    #[arg(short, long = "timefmt", default_value = DEFAULT_TIME_FORMAT)]
    pub time_format: String,

    /// Size unit (B, K, M, G, T, P, E, Z, Y or auto)
    #[arg(short = 'H', long = "humansize", value_name = "UNIT", default_value_t = SizeFormat::Bytes)]
    pub size_format: SizeFormat,

    /// Print `None` for empty fields and report missing targets
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Override the database directory
    #[arg(long)]
    pub dbpath: Option<PathBuf>,

    /// Override the installation root
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// First value of the `%!` counter
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub counter_start: i64,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

/// Mutually exclusive corpus selection.
#[derive(Args, Debug, Clone, Copy, Default)]
#[group(multiple = false)]
pub struct CorpusOpts {
    /// Query installed packages (default)
    #[arg(short = 'Q', long)]
    pub query: bool,

    /// Query repository databases
    #[arg(short = 'S', long)]
    pub sync: bool,

    /// Query package files given as targets
    #[arg(short = 'p', long)]
    pub file: bool,
}

impl CorpusOpts {
    /// The selected corpus.
    #[must_use]
    pub const fn corpus(self) -> Corpus {
        if self.sync {
            Corpus::Sync
        } else if self.file {
            Corpus::File
        } else {
            Corpus::Local
        }
    }
}
