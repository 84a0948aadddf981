//! Backup file entries and detection of locally modified config files.
use std::fs::File;
use std::io;
use std::path::Path;

use md5::{Digest as _, Md5};

/// A file pacman tracks for `.pacnew`/`.pacsave` handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupEntry {
    /// Path relative to the install root (no leading slash).
    pub path: String,
    /// MD5 of the file as shipped; `None` when the database has no hash.
    pub hash: Option<String>,
}

impl BackupEntry {
    /// Parse a `%BACKUP%` line (`path<TAB>md5`).
    ///
    /// # Examples
    ///
    /// ```
    /// use pkgfmt::package::BackupEntry;
    ///
    /// let entry = BackupEntry::parse("etc/pacman.conf\t0123abcd");
    /// assert_eq!(entry.path, "etc/pacman.conf");
    /// assert_eq!(entry.hash.as_deref(), Some("0123abcd"));
    /// ```
    #[must_use]
    pub fn parse(line: &str) -> Self {
        match line.split_once('\t') {
            Some((path, hash)) => Self {
                path: path.to_string(),
                hash: Some(hash.trim().to_string()).filter(|h| !h.is_empty()),
            },
            None => Self {
                path: line.trim().to_string(),
                hash: None,
            },
        }
    }
}

/// Source of file checksums.
#[cfg_attr(test, mockall::automock)]
pub trait Checksum {
    /// Lowercase hex MD5 of the file at `path`, or `None` if it cannot be
    /// read.
    fn md5_hex(&self, path: &Path) -> Option<String>;
}

/// [`Checksum`] that hashes files on disk.
#[derive(Debug, Clone, Copy)]
pub struct Md5File;

impl Checksum for Md5File {
    fn md5_hex(&self, path: &Path) -> Option<String> {
        let mut file = File::open(path).ok()?;
        let mut hasher = Md5::new();
        io::copy(&mut file, &mut hasher).ok()?;
        Some(
            hasher
                .finalize()
                .iter()
                .map(|b| format!("{b:02x}"))
                .collect(),
        )
    }
}

/// Return the paths of backup entries whose file under `root` no longer
/// matches the recorded hash.
///
/// Entries without a hash and files that cannot be read are not reported.
pub fn modified_files(entries: &[BackupEntry], root: &Path, checksum: &dyn Checksum) -> Vec<String> {
    entries
        .iter()
        .filter_map(|entry| {
            let hash = entry.hash.as_deref()?;
            let actual = checksum.md5_hex(&root.join(&entry.path))?;
            (!actual.eq_ignore_ascii_case(hash)).then(|| entry.path.clone())
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use std::path::PathBuf;

    #[test]
    fn parse_entry_without_hash() {
        let entry = BackupEntry::parse("etc/hosts");
        assert_eq!(entry.path, "etc/hosts");
        assert_eq!(entry.hash, None);
    }

    #[test]
    fn parse_entry_with_empty_hash() {
        let entry = BackupEntry::parse("etc/hosts\t");
        assert_eq!(entry.hash, None);
    }

    #[test]
    fn reports_only_changed_files() {
        let entries = vec![
            BackupEntry::parse("etc/a.conf\taaaa"),
            BackupEntry::parse("etc/b.conf\tbbbb"),
        ];
        let mut checksum = MockChecksum::new();
        checksum
            .expect_md5_hex()
            .with(eq(PathBuf::from("/root/etc/a.conf")))
            .return_const(Some("aaaa".to_string()));
        checksum
            .expect_md5_hex()
            .with(eq(PathBuf::from("/root/etc/b.conf")))
            .return_const(Some("ffff".to_string()));

        let modified = modified_files(&entries, Path::new("/root"), &checksum);
        assert_eq!(modified, vec!["etc/b.conf"]);
    }

    #[test]
    fn skips_unreadable_and_unhashed_files() {
        let entries = vec![
            BackupEntry::parse("etc/missing.conf\taaaa"),
            BackupEntry::parse("etc/nohash.conf"),
        ];
        let mut checksum = MockChecksum::new();
        checksum
            .expect_md5_hex()
            .times(1)
            .return_const(None::<String>);

        assert!(modified_files(&entries, Path::new("/"), &checksum).is_empty());
    }

    #[test]
    fn md5_file_hashes_contents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("f");
        std::fs::write(&path, "hello\n").expect("write");
        assert_eq!(
            Md5File.md5_hex(&path).as_deref(),
            Some("b1946ac92492d2347c6235b4d2611184")
        );
    }

    #[test]
    fn md5_file_missing_is_none() {
        assert_eq!(Md5File.md5_hex(Path::new("/nonexistent/pkgfmt")), None);
    }
}
