//! Standalone package archives given on the command line.
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use super::{Database, archive};
use crate::error::DatabaseError;
use crate::package::{Corpus, Package, pkginfo};

const PKGINFO: &str = ".PKGINFO";
const INSTALL: &str = ".INSTALL";

/// Load one package archive.
///
/// Metadata comes from `.PKGINFO`; the file list is every member outside
/// the top-level dot files, with directories marked by a trailing `/`.
///
/// # Errors
///
/// Returns an error if the archive cannot be read, has no `.PKGINFO`, or
/// its `.PKGINFO` is malformed.
pub fn load_package_file(path: &Path) -> Result<Package, DatabaseError> {
    let io_error = |source| DatabaseError::Io {
        path: path.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(path).map_err(io_error)?;
    let members = archive::read_members(path, |p| p == PKGINFO).map_err(io_error)?;

    let mut info = None;
    let mut has_scriptlet = false;
    let mut files = Vec::new();
    for member in members {
        match member.path.as_str() {
            PKGINFO => info = member.content,
            INSTALL => has_scriptlet = true,
            p if p.starts_with('.') => {}
            p if member.is_dir => files.push(format!("{p}/")),
            p => files.push(p.to_string()),
        }
    }

    let info = info.ok_or_else(|| DatabaseError::MissingPkgInfo {
        path: path.to_path_buf(),
    })?;
    let mut pkg = pkginfo::parse(&info).map_err(|source| DatabaseError::InvalidEntry {
        path: path.to_path_buf(),
        entry: PKGINFO.to_string(),
        source,
    })?;

    files.sort();
    pkg.files = files;
    pkg.has_scriptlet = has_scriptlet;
    pkg.download_size = i64::try_from(metadata.len()).unwrap_or(i64::MAX);
    pkg.filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());

    debug!("loaded package file {}", path.display());
    Ok(pkg)
}

/// Load every readable package archive into one database.
///
/// Archives that fail to load are reported and skipped.
#[must_use]
pub fn open<P: AsRef<Path>>(paths: &[P]) -> Database {
    let packages = paths
        .iter()
        .filter_map(|path| match load_package_file(path.as_ref()) {
            Ok(pkg) => Some(pkg),
            Err(e) => {
                warn!("{e}");
                None
            }
        })
        .collect();
    Database::new("file", Corpus::File, packages)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::db::archive::tests::{gzip, tar_bytes};

    const INFO: &str = "pkgname = hello\npkgver = 2.12-1\nsize = 1536\n";

    fn write_pkg(dir: &Path, name: &str, entries: &[(&str, Option<&str>)]) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, gzip(&tar_bytes(entries))).unwrap();
        path
    }

    #[test]
    fn loads_metadata_files_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pkg(
            dir.path(),
            "hello-2.12-1-x86_64.pkg.tar.gz",
            &[
                (".PKGINFO", Some(INFO)),
                (".MTREE", Some("#mtree")),
                (".INSTALL", Some("post_install() { :; }")),
                ("usr/", None),
                ("usr/bin/", None),
                ("usr/bin/hello", Some("ELF")),
            ],
        );

        let pkg = load_package_file(&path).unwrap();
        assert_eq!(pkg.name, "hello");
        assert_eq!(pkg.installed_size, 1536);
        assert!(pkg.has_scriptlet);
        assert_eq!(pkg.files, vec!["usr/", "usr/bin/", "usr/bin/hello"]);
        assert_eq!(pkg.filename.as_deref(), Some("hello-2.12-1-x86_64.pkg.tar.gz"));
        assert_eq!(
            pkg.download_size,
            i64::try_from(fs::metadata(&path).unwrap().len()).unwrap()
        );
        assert_eq!(pkg.repository, None);
    }

    #[test]
    fn loads_zstd_package() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello-2.12-1-x86_64.pkg.tar.zst");
        let tar = tar_bytes(&[(".PKGINFO", Some(INFO)), ("usr/bin/hello", Some("ELF"))]);
        fs::write(&path, zstd::encode_all(tar.as_slice(), 0).unwrap()).unwrap();

        let pkg = load_package_file(&path).unwrap();
        assert_eq!(pkg.name, "hello");
        assert_eq!(pkg.files, vec!["usr/bin/hello"]);
        assert_eq!(pkg.filename.as_deref(), Some("hello-2.12-1-x86_64.pkg.tar.zst"));
    }

    #[test]
    fn missing_pkginfo_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pkg(dir.path(), "bad.pkg.tar.gz", &[("usr/bin/x", Some("x"))]);
        let err = load_package_file(&path).unwrap_err();
        assert!(matches!(err, DatabaseError::MissingPkgInfo { .. }));
    }

    #[test]
    fn unreadable_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_pkg(dir.path(), "good.pkg.tar.gz", &[(".PKGINFO", Some(INFO))]);
        let missing = dir.path().join("missing.pkg.tar.gz");

        let db = open(&[missing, good]);
        assert_eq!(db.corpus, Corpus::File);
        assert_eq!(db.packages.len(), 1);
        assert_eq!(db.packages[0].name, "hello");
    }
}
