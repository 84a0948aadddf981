//! Domain-specific error types for pkgfmt.
//!
//! Internal modules return typed errors (e.g., [`ConfigError`],
//! [`DatabaseError`]) while the command layer converts them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error types
//!
//! ```text
//! ConfigError    config file parsing, include resolution
//! DatabaseError  local/sync database and archive reading
//! PackageError   malformed package metadata
//! ```
//!
//! The format interpreter has no error type: malformed directives render
//! as `?` instead of failing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort configuration resolution.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A config file (or the literal path of an unmatched include) could
    /// not be opened or read.
    #[error("IO error reading config file {}: {source}", path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A file includes itself, directly or through other files.
    #[error("include cycle detected at {}", path.display())]
    IncludeCycle {
        /// The file that was already being parsed.
        path: PathBuf,
    },

    /// Includes are nested deeper than the resolver allows.
    #[error("includes nested deeper than {limit} levels at {}", path.display())]
    IncludeDepth {
        /// The file that would have exceeded the limit.
        path: PathBuf,
        /// Maximum nesting depth.
        limit: usize,
    },
}

/// Errors that arise while opening package databases or package files.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// A database directory or archive could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path to the database or archive.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A package archive has no `.PKGINFO` member.
    #[error("{} is not a package archive (missing .PKGINFO)", path.display())]
    MissingPkgInfo {
        /// Path to the archive.
        path: PathBuf,
    },

    /// A database entry could not be parsed into a package.
    #[error("invalid entry {entry} in {}: {source}", path.display())]
    InvalidEntry {
        /// Path to the database.
        path: PathBuf,
        /// Name of the entry inside the database.
        entry: String,
        /// Underlying parse error.
        source: PackageError,
    },
}

/// Errors that arise from malformed package metadata.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PackageError {
    /// A required field was absent.
    #[error("missing required field {0}")]
    MissingField(&'static str),

    /// A numeric field held something other than an integer.
    #[error("field {field} is not a number: {value}")]
    InvalidNumber {
        /// Name of the field.
        field: &'static str,
        /// The offending value.
        value: String,
    },
}
