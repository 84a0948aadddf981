//! Print pacman package metadata using printf-style format strings.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: resolve `pacman.conf` and its includes into repository
//!   names and path overrides
//! - **[`db`]**: load the local, sync and file package corpora and look up
//!   targets
//! - **[`package`]**: package records and their on-disk metadata formats
//! - **[`format`]**: the format-directive interpreter
//! - **[`commands`]**: top-level orchestration
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod logging;
pub mod package;
