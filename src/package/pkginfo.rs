//! Parser for the `.PKGINFO` member of package archives.
use super::{BackupEntry, Dependency, Package};
use crate::error::PackageError;

/// Parse `.PKGINFO` content (`key = value` lines, `#` comments).
///
/// # Errors
///
/// Returns an error if `pkgname` or `pkgver` is missing or a numeric field
/// is malformed.
///
/// # Examples
///
/// ```
/// use pkgfmt::package::pkginfo::parse;
///
/// let pkg = parse("pkgname = htop\npkgver = 3.3.0-1\nsize = 450560\n").unwrap();
/// assert_eq!(pkg.name, "htop");
/// assert_eq!(pkg.installed_size, 450_560);
/// ```
pub fn parse(content: &str) -> Result<Package, PackageError> {
    let mut pkg = Package::default();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some((key, value)) = trimmed.split_once('=') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "pkgname" => pkg.name = value.to_string(),
            "pkgbase" => pkg.base = Some(value.to_string()),
            "pkgver" => pkg.version = value.to_string(),
            "pkgdesc" => pkg.description = Some(value.to_string()),
            "url" => pkg.url = Some(value.to_string()),
            "packager" => pkg.packager = Some(value.to_string()),
            "arch" => pkg.arch = Some(value.to_string()),
            "builddate" => pkg.build_date = number("builddate", value)?,
            "size" => pkg.installed_size = number("size", value)?,
            "license" => pkg.licenses.push(value.to_string()),
            "group" => pkg.groups.push(value.to_string()),
            "depend" => pkg.depends.push(Dependency::parse(value)),
            "optdepend" => pkg.optdepends.push(Dependency::parse(value)),
            "conflict" => pkg.conflicts.push(Dependency::parse(value)),
            "provides" => pkg.provides.push(Dependency::parse(value)),
            "replaces" => pkg.replaces.push(Dependency::parse(value)),
            "backup" => pkg.backup.push(BackupEntry {
                path: value.to_string(),
                hash: None,
            }),
            _ => {}
        }
    }

    if pkg.name.is_empty() {
        return Err(PackageError::MissingField("pkgname"));
    }
    if pkg.version.is_empty() {
        return Err(PackageError::MissingField("pkgver"));
    }
    Ok(pkg)
}

fn number(field: &'static str, value: &str) -> Result<i64, PackageError> {
    value.parse().map_err(|_| PackageError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}
