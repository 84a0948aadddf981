//! The installed-package database (`<dbpath>/local`).
use std::fs;
use std::path::Path;
use std::rc::Rc;

use tracing::debug;

use super::{Database, LOCAL_DB_NAME};
use crate::error::DatabaseError;
use crate::package::{Corpus, desc};

/// Open `<db_path>/local`, reading one package per entry directory.
///
/// Each entry holds a `desc` file, an optional `files` file and, when the
/// package has an install scriptlet, an `install` file.
///
/// # Errors
///
/// Returns an error if the directory or an entry's `desc` cannot be read, or
/// an entry is malformed.
pub fn open(db_path: &Path, root: &Path) -> Result<Database, DatabaseError> {
    let dir = db_path.join(LOCAL_DB_NAME);
    let io_error = |path: &Path| {
        let path = path.to_path_buf();
        move |source| DatabaseError::Io { path, source }
    };

    let mut entries = fs::read_dir(&dir)
        .map_err(io_error(&dir))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_error(&dir))?;
    entries.sort_by_key(fs::DirEntry::file_name);

    let install_root: Rc<Path> = Rc::from(root);
    let mut packages = Vec::new();
    for entry in entries {
        let entry_dir = entry.path();
        if !entry_dir.is_dir() {
            continue;
        }
        let entry_name = entry.file_name().to_string_lossy().into_owned();
        let invalid = |source| DatabaseError::InvalidEntry {
            path: dir.clone(),
            entry: entry_name.clone(),
            source,
        };

        let desc_path = entry_dir.join("desc");
        let content = fs::read_to_string(&desc_path).map_err(io_error(&desc_path))?;
        let mut pkg = desc::parse(&content).map_err(invalid)?;

        let files_path = entry_dir.join("files");
        if files_path.is_file() {
            let files = fs::read_to_string(&files_path).map_err(io_error(&files_path))?;
            desc::parse_into(&mut pkg, &files).map_err(invalid)?;
        }

        pkg.has_scriptlet = entry_dir.join("install").is_file();
        pkg.repository = Some(LOCAL_DB_NAME.to_string());
        pkg.install_root = Some(Rc::clone(&install_root));
        packages.push(pkg);
    }

    debug!("loaded {} installed packages from {}", packages.len(), dir.display());
    Ok(Database::new(LOCAL_DB_NAME, Corpus::Local, packages))
}

/// Write a package entry the way pacman lays out the local database.
#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) fn write_entry(db_path: &Path, dir_name: &str, desc: &str, files: Option<&str>) {
    let entry = db_path.join(LOCAL_DB_NAME).join(dir_name);
    fs::create_dir_all(&entry).unwrap();
    fs::write(entry.join("desc"), desc).unwrap();
    if let Some(files) = files {
        fs::write(entry.join("files"), files).unwrap();
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::package::PackageRecord as _;

    #[test]
    fn reads_entries_sorted_with_files_and_scriptlet() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path();
        write_entry(
            db,
            "zlib-1:1.3.1-1",
            "%NAME%\nzlib\n\n%VERSION%\n1:1.3.1-1\n\n%REASON%\n1\n",
            None,
        );
        write_entry(
            db,
            "pacman-6.1.0-3",
            "%NAME%\npacman\n\n%VERSION%\n6.1.0-3\n\n%DEPENDS%\nzlib\n",
            Some("%FILES%\netc/\netc/pacman.conf\n\n%BACKUP%\netc/pacman.conf\tabc\n"),
        );
        fs::write(db.join("local/pacman-6.1.0-3/install"), "post_install() { :; }\n").unwrap();
        fs::write(db.join("local/ALPM_DB_VERSION"), "9\n").unwrap();

        let database = open(db, Path::new("/")).unwrap();
        assert_eq!(database.name, "local");
        let names: Vec<_> = database.packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["pacman", "zlib"]);

        let pacman = &database.packages[0];
        assert!(pacman.has_scriptlet);
        assert_eq!(pacman.files, vec!["etc/", "etc/pacman.conf"]);
        assert_eq!(pacman.backup[0].path, "etc/pacman.conf");
        assert_eq!(pacman.repository(), Some("local"));
        assert!(pacman.install_root.is_some());

        let zlib = &database.packages[1];
        assert!(!zlib.has_scriptlet);
        assert_eq!(zlib.required_by, vec!["pacman"]);
    }

    #[test]
    fn missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = open(dir.path(), Path::new("/")).unwrap_err();
        assert!(matches!(err, DatabaseError::Io { .. }));
    }

    #[test]
    fn entry_without_name_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        write_entry(dir.path(), "broken-1", "%VERSION%\n1\n", None);
        let err = open(dir.path(), Path::new("/")).unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidEntry { ref entry, .. } if entry == "broken-1"));
    }
}
