//! Line-oriented parser for pacman-style configuration files.
//!
//! A single [`ParserState`] is threaded through every file reached by
//! `Include`, so the current section carries across file boundaries: a file
//! included from inside `[options]` starts in `[options]`, and a section it
//! opens stays open for the rest of the including file.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use glob::MatchOptions;
use tracing::debug;

use super::Config;
use crate::error::ConfigError;

/// The reserved section holding global options.
pub const OPTIONS_SECTION: &str = "options";

/// Maximum nesting of `Include` directives.
pub const MAX_INCLUDE_DEPTH: usize = 32;

/// Mutable state shared by the whole recursive parse.
#[derive(Debug, Default)]
pub struct ParserState {
    /// The section the next line belongs to.
    pub section: Option<String>,
    /// The configuration accumulated so far.
    pub config: Config,
    /// Canonical paths of the files currently being parsed, outermost first.
    chain: Vec<PathBuf>,
}

impl ParserState {
    /// Consume the state and return the resolved configuration.
    #[must_use]
    pub fn into_config(self) -> Config {
        self.config
    }

    fn in_options(&self) -> bool {
        self.section.as_deref() == Some(OPTIONS_SECTION)
    }
}

/// Parse one configuration file into `state`, following includes.
///
/// # Errors
///
/// Returns an error if this file or any file it includes cannot be read,
/// if a file includes itself, or if includes nest deeper than
/// [`MAX_INCLUDE_DEPTH`].
pub fn parse_file(path: &Path, state: &mut ParserState) -> Result<(), ConfigError> {
    let io_error = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_error)?;
    let canonical = dunce::canonicalize(path).map_err(io_error)?;

    if state.chain.contains(&canonical) {
        return Err(ConfigError::IncludeCycle { path: canonical });
    }
    if state.chain.len() >= MAX_INCLUDE_DEPTH {
        return Err(ConfigError::IncludeDepth {
            path: canonical,
            limit: MAX_INCLUDE_DEPTH,
        });
    }

    debug!("parsing config file {}", path.display());
    state.chain.push(canonical);
    let result = parse_lines(BufReader::new(file), path, state);
    state.chain.pop();
    result
}

/// Parse configuration lines from a reader.
///
/// `path` is only used to attribute read errors.
///
/// # Errors
///
/// Returns an error if reading fails or an included file cannot be parsed.
pub fn parse_lines<R: BufRead>(
    reader: R,
    path: &Path,
    state: &mut ParserState,
) -> Result<(), ConfigError> {
    for line in reader.lines() {
        let line = line.map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(name) = parse_section_header(trimmed) {
            debug!("section [{name}]");
            if name != OPTIONS_SECTION {
                state.config.repos.push(name.to_string());
            }
            state.section = Some(name.to_string());
            continue;
        }

        if !state.in_options() {
            continue;
        }

        let Some((key, value)) = trimmed.split_once('=') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        match key {
            "Include" => resolve_include(value, state)?,
            "DBPath" => state.config.db_path = Some(value.to_string()),
            "RootDir" => state.config.root_dir = Some(value.to_string()),
            _ => {}
        }
    }
    Ok(())
}

/// Expand an `Include` pattern and parse every match in sorted order.
///
/// A pattern that is invalid or matches nothing is treated as a literal
/// path, so a mistyped include fails on open instead of vanishing.
/// Directories that cannot be read while walking the pattern are skipped.
///
/// # Errors
///
/// Returns the first error from parsing a match.
pub fn resolve_include(pattern: &str, state: &mut ParserState) -> Result<(), ConfigError> {
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };

    let mut paths = match glob::glob_with(pattern, options) {
        Ok(entries) => entries
            .filter_map(|entry| {
                entry
                    .inspect_err(|e| debug!("skipping unreadable include match: {e}"))
                    .ok()
            })
            .collect(),
        Err(e) => {
            debug!("include pattern '{pattern}' is not a valid glob: {e}");
            Vec::new()
        }
    };

    if paths.is_empty() {
        paths.push(PathBuf::from(pattern));
    }
    paths.sort();

    debug!("include '{pattern}' resolved to {} file(s)", paths.len());
    for path in &paths {
        parse_file(path, state)?;
    }
    Ok(())
}

/// Return the enclosed text of a `[section]` line.
fn parse_section_header(line: &str) -> Option<&str> {
    line.strip_prefix('[')?.strip_suffix(']')
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;

    fn parse_str(content: &str) -> Result<Config, ConfigError> {
        let mut state = ParserState::default();
        parse_lines(Cursor::new(content), Path::new("test.conf"), &mut state)?;
        Ok(state.into_config())
    }

    #[test]
    fn repositories_in_file_order() {
        let config = parse_str("[core]\n[extra]\n[options]\n[multilib]\n").unwrap();
        assert_eq!(config.repos, vec!["core", "extra", "multilib"]);
    }

    #[test]
    fn duplicate_sections_are_preserved() {
        let config = parse_str("[core]\n[core]\n").unwrap();
        assert_eq!(config.repos, vec!["core", "core"]);
    }

    #[test]
    fn repository_before_options_keeps_its_position() {
        let config = parse_str("[testing]\n[options]\nDBPath = /tmp/db\n[core]\n").unwrap();
        assert_eq!(config.repos, vec!["testing", "core"]);
        assert_eq!(config.db_path.as_deref(), Some("/tmp/db"));
    }

    #[test]
    fn options_keys_last_write_wins() {
        let config = parse_str(
            "[options]\nRootDir = /mnt\nDBPath=/a\nDBPath =  /b  \nRootDir=/srv\n",
        )
        .unwrap();
        assert_eq!(config.db_path.as_deref(), Some("/b"));
        assert_eq!(config.root_dir.as_deref(), Some("/srv"));
    }

    #[test]
    fn keys_outside_options_are_ignored() {
        let config = parse_str("DBPath = /early\n[core]\nDBPath = /x\nServer = https://a\n").unwrap();
        assert_eq!(config.db_path, None);
        assert_eq!(config.repos, vec!["core"]);
    }

    #[test]
    fn unknown_options_are_ignored() {
        let config = parse_str("[options]\nHoldPkg = pacman glibc\nColor\nArchitecture = auto\n").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let config = parse_str("# [commented]\n\n   # indented\n[core]\n").unwrap();
        assert_eq!(config.repos, vec!["core"]);
    }

    #[test]
    fn inline_hash_is_part_of_the_value() {
        let config = parse_str("[options]\nDBPath = /var/lib/pacman # old\n").unwrap();
        assert_eq!(config.db_path.as_deref(), Some("/var/lib/pacman # old"));
    }

    #[test]
    fn value_split_at_first_equals() {
        let config = parse_str("[options]\nRootDir = /a=b\n").unwrap();
        assert_eq!(config.root_dir.as_deref(), Some("/a=b"));
    }

    #[test]
    fn header_keeps_inner_whitespace() {
        let config = parse_str("  [ spaced ]  \n").unwrap();
        assert_eq!(config.repos, vec![" spaced "]);
    }

    #[test]
    fn missing_file_is_io_error_naming_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.conf");
        let mut state = ParserState::default();
        let err = parse_file(&missing, &mut state).unwrap_err();
        assert!(matches!(&err, ConfigError::Io { path, .. } if path == &missing));
    }

    #[test]
    fn include_sorted_and_shares_section() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("b.conf"), "[beta]\n").unwrap();
        fs::write(sub.join("a.conf"), "[alpha]\n").unwrap();
        let root = dir.path().join("pacman.conf");
        fs::write(
            &root,
            format!("[options]\nInclude = {}/*.conf\n", sub.display()),
        )
        .unwrap();

        let mut state = ParserState::default();
        parse_file(&root, &mut state).unwrap();
        assert_eq!(state.section.as_deref(), Some("beta"));
        assert_eq!(state.into_config().repos, vec!["alpha", "beta"]);
    }

    #[test]
    fn included_file_inherits_options_section() {
        let dir = tempfile::tempdir().unwrap();
        let inc = dir.path().join("paths.conf");
        fs::write(&inc, "DBPath = /from/include\n").unwrap();
        let root = dir.path().join("pacman.conf");
        fs::write(&root, format!("[options]\nInclude = {}\n", inc.display())).unwrap();

        let mut state = ParserState::default();
        parse_file(&root, &mut state).unwrap();
        assert_eq!(state.config.db_path.as_deref(), Some("/from/include"));
    }

    #[test]
    fn section_opened_by_include_continues_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let inc = dir.path().join("repo.conf");
        fs::write(&inc, "[custom]\n").unwrap();
        let root = dir.path().join("pacman.conf");
        fs::write(
            &root,
            format!("[options]\nInclude = {}\nDBPath = /ignored\n", inc.display()),
        )
        .unwrap();

        let mut state = ParserState::default();
        parse_file(&root, &mut state).unwrap();
        let config = state.into_config();
        assert_eq!(config.repos, vec!["custom"]);
        assert_eq!(config.db_path, None);
    }

    #[test]
    fn unmatched_include_is_opened_literally() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = dir.path().join("missing-*.conf");
        let root = dir.path().join("pacman.conf");
        fs::write(&root, format!("[options]\nInclude = {}\n", pattern.display())).unwrap();

        let mut state = ParserState::default();
        let err = parse_file(&root, &mut state).unwrap_err();
        assert!(matches!(&err, ConfigError::Io { path, .. } if path == &pattern));
    }

    #[test]
    fn failure_aborts_remaining_includes() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.conf");
        fs::write(&good, "[good]\n").unwrap();
        let root = dir.path().join("pacman.conf");
        fs::write(
            &root,
            format!(
                "[options]\nInclude = {}\nInclude = {}\n",
                dir.path().join("absent.conf").display(),
                good.display()
            ),
        )
        .unwrap();

        let mut state = ParserState::default();
        assert!(parse_file(&root, &mut state).is_err());
        assert!(state.config.repos.is_empty());
    }

    #[test]
    fn self_include_is_a_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("pacman.conf");
        fs::write(&root, format!("[options]\nInclude = {}\n", root.display())).unwrap();

        let mut state = ParserState::default();
        let err = parse_file(&root, &mut state).unwrap_err();
        assert!(matches!(err, ConfigError::IncludeCycle { .. }));
    }

    #[test]
    fn mutual_include_is_a_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.conf");
        let b = dir.path().join("b.conf");
        fs::write(&a, format!("[options]\nInclude = {}\n", b.display())).unwrap();
        fs::write(&b, format!("Include = {}\n", a.display())).unwrap();

        let mut state = ParserState::default();
        let err = parse_file(&a, &mut state).unwrap_err();
        assert!(matches!(err, ConfigError::IncludeCycle { .. }));
    }

    #[test]
    fn same_file_included_twice_is_not_a_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let inc = dir.path().join("root.conf");
        fs::write(&inc, "RootDir = /mnt\n").unwrap();
        let root = dir.path().join("pacman.conf");
        fs::write(
            &root,
            format!("[options]\nInclude = {0}\nInclude = {0}\n", inc.display()),
        )
        .unwrap();

        let mut state = ParserState::default();
        parse_file(&root, &mut state).unwrap();
        assert_eq!(state.into_config().root_dir.as_deref(), Some("/mnt"));
    }

    #[test]
    fn includes_nested_past_the_limit_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let depth = MAX_INCLUDE_DEPTH + 8;
        for i in 0..depth {
            let next = dir.path().join(format!("{}.conf", i + 1));
            let section = if i == 0 { "[options]\n" } else { "" };
            fs::write(
                dir.path().join(format!("{i}.conf")),
                format!("{section}Include = {}\n", next.display()),
            )
            .unwrap();
        }
        fs::write(dir.path().join(format!("{depth}.conf")), "[deep]\n").unwrap();

        let mut state = ParserState::default();
        let err = parse_file(&dir.path().join("0.conf"), &mut state).unwrap_err();
        match err {
            ConfigError::IncludeDepth { path, limit } => {
                assert_eq!(limit, MAX_INCLUDE_DEPTH);
                assert!(path.ends_with(format!("{MAX_INCLUDE_DEPTH}.conf")));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(state.config.repos.is_empty());
    }

    #[test]
    fn includes_nested_up_to_the_limit_are_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let last = MAX_INCLUDE_DEPTH - 1;
        for i in 0..last {
            let next = dir.path().join(format!("{}.conf", i + 1));
            let section = if i == 0 { "[options]\n" } else { "" };
            fs::write(
                dir.path().join(format!("{i}.conf")),
                format!("{section}Include = {}\n", next.display()),
            )
            .unwrap();
        }
        fs::write(dir.path().join(format!("{last}.conf")), "[deep]\n").unwrap();

        let mut state = ParserState::default();
        parse_file(&dir.path().join("0.conf"), &mut state).unwrap();
        assert_eq!(state.into_config().repos, vec!["deep"]);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_directory_in_pattern_is_skipped() {
        use std::os::unix::fs::PermissionsExt as _;

        let dir = tempfile::tempdir().unwrap();
        let readable = dir.path().join("a");
        let locked = dir.path().join("b");
        fs::create_dir(&readable).unwrap();
        fs::create_dir(&locked).unwrap();
        fs::write(readable.join("repo.conf"), "[core]\n").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let root = dir.path().join("pacman.conf");
        fs::write(
            &root,
            format!("[options]\nInclude = {}/*/*.conf\n", dir.path().display()),
        )
        .unwrap();

        let mut state = ParserState::default();
        let result = parse_file(&root, &mut state);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        result.unwrap();
        assert_eq!(state.into_config().repos, vec!["core"]);
    }

    #[test]
    fn chain_is_empty_after_parse() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("pacman.conf");
        fs::write(&root, "[core]\n").unwrap();
        let mut state = ParserState::default();
        parse_file(&root, &mut state).unwrap();
        assert!(state.chain.is_empty());
    }
}
