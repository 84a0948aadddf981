//! Repository databases (`<dbpath>/sync/<repo>.db`).
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{Database, archive};
use crate::error::DatabaseError;
use crate::package::{Corpus, desc};

/// Files inside a repository entry directory that carry metadata.
const ENTRY_FILES: [&str; 3] = ["desc", "depends", "files"];

/// Path of the database file for `repo`.
#[must_use]
pub fn db_file(db_path: &Path, repo: &str) -> PathBuf {
    db_path.join("sync").join(format!("{repo}.db"))
}

/// Open the repository database for `repo`.
///
/// The database is a tar archive of `<name>-<version>/` directories, each
/// holding `desc` and optionally `depends` and `files`.
///
/// # Errors
///
/// Returns an error if the archive cannot be read or an entry is malformed.
pub fn open(db_path: &Path, repo: &str) -> Result<Database, DatabaseError> {
    let path = db_file(db_path, repo);
    let members = archive::read_members(&path, is_entry_file).map_err(|source| DatabaseError::Io {
        path: path.clone(),
        source,
    })?;

    // Entry directories in archive order, with their files concatenated.
    let mut order: Vec<String> = Vec::new();
    let mut contents: HashMap<String, String> = HashMap::new();
    for member in members {
        let Some(content) = member.content else {
            continue;
        };
        let Some((entry, _)) = member.path.split_once('/') else {
            continue;
        };
        let buffer = contents.entry(entry.to_string()).or_insert_with(|| {
            order.push(entry.to_string());
            String::new()
        });
        buffer.push_str(&content);
        buffer.push_str("\n\n");
    }

    let mut packages = Vec::with_capacity(order.len());
    for entry in order {
        let content = contents.remove(&entry).unwrap_or_default();
        let mut pkg = desc::parse(&content).map_err(|source| DatabaseError::InvalidEntry {
            path: path.clone(),
            entry: entry.clone(),
            source,
        })?;
        pkg.repository = Some(repo.to_string());
        packages.push(pkg);
    }
    packages.sort_by(|a, b| a.name.cmp(&b.name));

    debug!("loaded {} packages from {}", packages.len(), path.display());
    Ok(Database::new(repo, Corpus::Sync, packages))
}

fn is_entry_file(path: &str) -> bool {
    path.split_once('/')
        .is_some_and(|(_, file)| ENTRY_FILES.contains(&file))
}
