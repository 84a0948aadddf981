//! Package databases and target lookup.
//!
//! Three corpora are supported: the installed-package database
//! ([`local`]), repository databases ([`sync`]) and standalone package
//! archives ([`file`]).

pub mod archive;
pub mod file;
pub mod local;
pub mod sync;

use tracing::info;

use crate::package::{Corpus, Package};

/// Name of the installed-package database.
pub const LOCAL_DB_NAME: &str = "local";

/// A loaded database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Database {
    /// Repository name (`local` for installed packages).
    pub name: String,
    /// Which corpus the packages belong to.
    pub corpus: Corpus,
    /// Packages in lookup order.
    pub packages: Vec<Package>,
}

impl Database {
    /// Build a database, computing each package's reverse dependencies.
    #[must_use]
    pub fn new(name: &str, corpus: Corpus, mut packages: Vec<Package>) -> Self {
        compute_required_by(&mut packages);
        Self {
            name: name.to_string(),
            corpus,
            packages,
        }
    }

    /// Find a package by exact name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.name == name)
    }

    /// Find a package by exact name, falling back to the first package that
    /// provides `name`.
    #[must_use]
    pub fn find_satisfier(&self, name: &str) -> Option<&Package> {
        self.find(name)
            .or_else(|| self.packages.iter().find(|p| p.provides_name(name)))
    }
}

/// Fill in `required_by` for every package from the dependencies of the
/// others.
///
/// A dependency points at a package when it names the package or one of
/// its provisions.
pub fn compute_required_by(packages: &mut [Package]) {
    let required_by: Vec<Vec<String>> = packages
        .iter()
        .map(|target| {
            let mut names: Vec<String> = packages
                .iter()
                .filter(|pkg| {
                    pkg.depends
                        .iter()
                        .any(|dep| dep.name == target.name || target.provides_name(&dep.name))
                })
                .map(|pkg| pkg.name.clone())
                .collect();
            names.sort();
            names.dedup();
            names
        })
        .collect();

    for (pkg, names) in packages.iter_mut().zip(required_by) {
        pkg.required_by = names;
    }
}

/// Resolve command-line targets against the databases in order.
///
/// With no targets every package of every database is returned. A target
/// of the form `repo/name` only searches that repository. Otherwise each
/// database is asked for an exact match, then a provider. With `readone`
/// the search for a target stops at the first database that has it.
pub fn resolve_targets<'d>(
    databases: &'d [Database],
    targets: &[String],
    readone: bool,
) -> Vec<&'d Package> {
    if targets.is_empty() {
        return databases.iter().flat_map(|db| &db.packages).collect();
    }

    let mut results = Vec::new();
    for target in targets {
        let (repo, name) = match target.split_once('/') {
            Some((repo, name)) => (Some(repo), name),
            None => (None, target.as_str()),
        };

        let mut found = false;
        for db in databases {
            if repo.is_some_and(|r| r != db.name) {
                continue;
            }
            let Some(pkg) = db.find_satisfier(name) else {
                continue;
            };
            found = true;
            results.push(pkg);
            if readone {
                break;
            }
        }

        if !found {
            info!("package '{name}' not found");
        }
    }
    results
}
