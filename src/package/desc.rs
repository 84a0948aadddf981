//! Parser for pacman database entries (`desc`, `files`, `depends`).
//!
//! Entries are blocks of a `%KEY%` header line followed by one value per
//! line, terminated by a blank line:
//!
//! ```text
//! %NAME%
//! pacman
//!
//! %DEPENDS%
//! bash
//! glibc
//! ```
use super::{BackupEntry, Dependency, InstallReason, Package, Validation};
use crate::error::PackageError;

/// Parse one or more concatenated database entry files into a package.
///
/// # Errors
///
/// Returns an error if `%NAME%` or `%VERSION%` is missing or a numeric
/// field is malformed.
///
/// # Examples
///
/// ```
/// use pkgfmt::package::desc::parse;
///
/// let pkg = parse("%NAME%\nzsh\n\n%VERSION%\n5.9-5\n").unwrap();
/// assert_eq!(pkg.name, "zsh");
/// assert_eq!(pkg.version, "5.9-5");
/// ```
pub fn parse(content: &str) -> Result<Package, PackageError> {
    let mut pkg = Package::default();
    parse_into(&mut pkg, content)?;
    if pkg.name.is_empty() {
        return Err(PackageError::MissingField("NAME"));
    }
    if pkg.version.is_empty() {
        return Err(PackageError::MissingField("VERSION"));
    }
    Ok(pkg)
}

/// Merge the blocks in `content` into `pkg`.
///
/// Unknown keys are skipped.
///
/// # Errors
///
/// Returns an error if a numeric field is malformed.
pub fn parse_into(pkg: &mut Package, content: &str) -> Result<(), PackageError> {
    let mut key: Option<&str> = None;

    for line in content.lines() {
        if line.is_empty() {
            key = None;
            continue;
        }
        match key {
            Some(k) => apply(pkg, k, line)?,
            None => key = parse_header(line),
        }
    }

    Ok(())
}

fn parse_header(line: &str) -> Option<&str> {
    line.strip_prefix('%')?.strip_suffix('%')
}

fn apply(pkg: &mut Package, key: &str, value: &str) -> Result<(), PackageError> {
    match key {
        "NAME" => pkg.name = value.to_string(),
        "VERSION" => pkg.version = value.to_string(),
        "BASE" => pkg.base = Some(value.to_string()),
        "DESC" => pkg.description = Some(value.to_string()),
        "URL" => pkg.url = Some(value.to_string()),
        "ARCH" => pkg.arch = Some(value.to_string()),
        "PACKAGER" => pkg.packager = Some(value.to_string()),
        "FILENAME" => pkg.filename = Some(value.to_string()),
        "MD5SUM" => pkg.md5sum = Some(value.to_string()),
        "SHA256SUM" => pkg.sha256sum = Some(value.to_string()),
        "PGPSIG" => pkg.signature = Some(value.to_string()),
        "BUILDDATE" => pkg.build_date = number("BUILDDATE", value)?,
        "INSTALLDATE" => pkg.install_date = number("INSTALLDATE", value)?,
        // Local entries record the installed size as SIZE, sync entries as ISIZE.
        "SIZE" => pkg.installed_size = number("SIZE", value)?,
        "ISIZE" => pkg.installed_size = number("ISIZE", value)?,
        "CSIZE" => pkg.download_size = number("CSIZE", value)?,
        "REASON" => {
            pkg.reason = if value == "1" {
                InstallReason::Dependency
            } else {
                InstallReason::Explicit
            };
        }
        "GROUPS" => pkg.groups.push(value.to_string()),
        "LICENSE" => pkg.licenses.push(value.to_string()),
        "VALIDATION" => pkg.validation.extend(Validation::parse(value)),
        "DEPENDS" => pkg.depends.push(Dependency::parse(value)),
        "OPTDEPENDS" => pkg.optdepends.push(Dependency::parse(value)),
        "CONFLICTS" => pkg.conflicts.push(Dependency::parse(value)),
        "PROVIDES" => pkg.provides.push(Dependency::parse(value)),
        "REPLACES" => pkg.replaces.push(Dependency::parse(value)),
        "FILES" => pkg.files.push(value.to_string()),
        "BACKUP" => pkg.backup.push(BackupEntry::parse(value)),
        _ => {}
    }
    Ok(())
}

fn number(field: &'static str, value: &str) -> Result<i64, PackageError> {
    value
        .trim()
        .parse()
        .map_err(|_| PackageError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}
