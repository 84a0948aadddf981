//! Configuration resolution.
//!
//! The pacman-style configuration file names the repositories to query and
//! may override the database path and filesystem root. Command-line
//! overrides are layered on top by [`Config::resolve_paths`].

pub mod ini;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ConfigError;

/// Default configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/pacman.conf";
/// Default filesystem root.
pub const DEFAULT_ROOT: &str = "/";
/// Database directory relative to the root when no path is configured.
pub const DEFAULT_DB_SUBDIR: &str = "var/lib/pacman";

/// A fully resolved configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Repository names in declaration order; duplicates are kept.
    pub repos: Vec<String>,
    /// `DBPath` override, last occurrence wins.
    pub db_path: Option<String>,
    /// `RootDir` override, last occurrence wins.
    pub root_dir: Option<String>,
}

/// Filesystem locations derived from configuration and flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// Filesystem root installed packages live under.
    pub root: PathBuf,
    /// Directory holding the `local/` and `sync/` databases.
    pub db_path: PathBuf,
}

impl Config {
    /// Resolve the configuration rooted at `path`, following includes.
    ///
    /// # Errors
    ///
    /// Returns an error if any file cannot be read or the include graph is
    /// cyclic or too deep. No partial configuration is returned.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use pkgfmt::config::Config;
    ///
    /// let config = Config::load(Path::new("/etc/pacman.conf")).unwrap();
    /// println!("{:?}", config.repos);
    /// ```
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut state = ini::ParserState::default();
        ini::parse_file(path, &mut state)?;
        let config = state.into_config();
        debug!(
            "resolved {} repositories from {}",
            config.repos.len(),
            path.display()
        );
        Ok(config)
    }

    /// Work out the root and database directories.
    ///
    /// Explicit overrides take precedence over the file values. Without any
    /// database path the database lives under `<root>/var/lib/pacman`.
    #[must_use]
    pub fn resolve_paths(&self, root_override: Option<&Path>, db_override: Option<&Path>) -> Paths {
        let root = root_override
            .map(Path::to_path_buf)
            .or_else(|| self.root_dir.as_deref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT));
        let db_path = db_override
            .map(Path::to_path_buf)
            .or_else(|| self.db_path.as_deref().map(PathBuf::from))
            .unwrap_or_else(|| root.join(DEFAULT_DB_SUBDIR));
        Paths { root, db_path }
    }
}
