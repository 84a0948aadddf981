//! Package records: the field-level view the format interpreter renders.
//!
//! [`PackageRecord`] is the capability interface the directive registry
//! reads from. [`Package`] is the concrete record produced by the database
//! readers from pacman `desc` entries or `.PKGINFO` files.

pub mod backup;
pub mod desc;
pub mod pkginfo;

use std::fmt;
use std::path::Path;
use std::rc::Rc;

pub use backup::BackupEntry;

/// The data source a record was loaded from.
///
/// Some directives only make sense for one corpus (install date only exists
/// for installed packages, a package filename only for repository and file
/// packages).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Corpus {
    /// Installed packages from the local database.
    #[default]
    Local,
    /// Packages from repository (sync) databases.
    Sync,
    /// Standalone package archives on disk.
    File,
}

/// Why a package is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstallReason {
    /// Installed explicitly by the user.
    #[default]
    Explicit,
    /// Installed as a dependency of another package.
    Dependency,
}

impl InstallReason {
    /// Display label used by the `%w` directive.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Explicit => "explicit",
            Self::Dependency => "dependency",
        }
    }
}

/// How an installed package was validated at install time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// No validation was performed.
    None,
    /// MD5 checksum.
    Md5,
    /// SHA-256 checksum.
    Sha256,
    /// PGP signature.
    Signature,
}

impl Validation {
    /// Parse a `%VALIDATION%` value (`none`, `md5`, `sha256`, `pgp`).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "md5" => Some(Self::Md5),
            "sha256" => Some(Self::Sha256),
            "pgp" => Some(Self::Signature),
            _ => None,
        }
    }

    /// Display label used by the `%V` directive.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Md5 => "MD5 Sum",
            Self::Sha256 => "SHA256 Sum",
            Self::Signature => "Signature",
        }
    }
}

/// Version comparison operator in a dependency string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepOp {
    /// `=`
    Eq,
    /// `>=`
    Ge,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `<`
    Lt,
}

impl DepOp {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ge => ">=",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Lt => "<",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "=" => Some(Self::Eq),
            ">=" => Some(Self::Ge),
            "<=" => Some(Self::Le),
            ">" => Some(Self::Gt),
            "<" => Some(Self::Lt),
            _ => None,
        }
    }
}

/// A dependency-like relation (depends, optdepends, conflicts, provides,
/// replaces).
///
/// # Examples
///
/// ```
/// use pkgfmt::package::Dependency;
///
/// let dep = Dependency::parse("python>=3.11: for the plugin API");
/// assert_eq!(dep.name, "python");
/// assert_eq!(dep.to_string(), "python>=3.11: for the plugin API");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Package (or virtual provision) name.
    pub name: String,
    /// Optional version operator and version.
    pub constraint: Option<(DepOp, String)>,
    /// Optional description (only used by optional dependencies).
    pub description: Option<String>,
}

impl Dependency {
    /// Parse `name[op version][: description]`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let (spec, description) = match s.split_once(": ") {
            Some((spec, desc)) => (spec, Some(desc.trim().to_string())),
            None => (s, None),
        };
        let spec = spec.trim();
        let (name, constraint) = match spec.find(['<', '>', '=']) {
            Some(idx) => {
                let (name, rest) = spec.split_at(idx);
                let op_len = rest
                    .chars()
                    .take_while(|c| matches!(c, '<' | '>' | '='))
                    .count();
                let (op, version) = rest.split_at(op_len);
                let constraint = DepOp::parse(op).map(|op| (op, version.to_string()));
                (name, constraint)
            }
            None => (spec, None),
        };
        Self {
            name: name.to_string(),
            constraint,
            description: description.filter(|d| !d.is_empty()),
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some((op, version)) = &self.constraint {
            write!(f, "{}{version}", op.as_str())?;
        }
        if let Some(desc) = &self.description {
            write!(f, ": {desc}")?;
        }
        Ok(())
    }
}

/// Read access to every field a format directive can render.
///
/// Timestamps are seconds since the epoch with `0` meaning "unknown";
/// sizes are in bytes.
pub trait PackageRecord {
    /// Package name.
    fn name(&self) -> &str;
    /// Full version string (`epoch:pkgver-pkgrel`).
    fn version(&self) -> &str;
    /// Package base name.
    fn base(&self) -> Option<&str>;
    /// One-line description.
    fn description(&self) -> Option<&str>;
    /// Upstream URL.
    fn url(&self) -> Option<&str>;
    /// Packager name and email.
    fn packager(&self) -> Option<&str>;
    /// MD5 checksum of the package archive.
    fn md5sum(&self) -> Option<&str>;
    /// SHA-256 checksum of the package archive.
    fn sha256sum(&self) -> Option<&str>;
    /// Base64-encoded PGP signature.
    fn signature(&self) -> Option<&str>;
    /// Target architecture.
    fn arch(&self) -> Option<&str>;
    /// Archive filename.
    fn filename(&self) -> Option<&str>;
    /// Name of the database the record came from.
    fn repository(&self) -> Option<&str>;
    /// Whether the package ships an install scriptlet.
    fn has_scriptlet(&self) -> bool;
    /// Install reason.
    fn reason(&self) -> InstallReason;
    /// Build timestamp.
    fn build_date(&self) -> i64;
    /// Install timestamp.
    fn install_date(&self) -> i64;
    /// Compressed archive size.
    fn download_size(&self) -> i64;
    /// Installed size.
    fn installed_size(&self) -> i64;
    /// License identifiers.
    fn licenses(&self) -> &[String];
    /// Package groups.
    fn groups(&self) -> &[String];
    /// Runtime dependencies.
    fn depends(&self) -> &[Dependency];
    /// Optional dependencies.
    fn optdepends(&self) -> &[Dependency];
    /// Conflicting packages.
    fn conflicts(&self) -> &[Dependency];
    /// Provided virtual packages.
    fn provides(&self) -> &[Dependency];
    /// Replaced packages.
    fn replaces(&self) -> &[Dependency];
    /// Files owned by the package.
    fn files(&self) -> &[String];
    /// Backup (config) file entries.
    fn backup(&self) -> &[BackupEntry];
    /// Names of packages in the same database that depend on this one.
    fn required_by(&self) -> &[String];
    /// Install-time validation methods; empty when unknown.
    fn validation(&self) -> &[Validation];
    /// Backup files whose on-disk contents differ from the recorded hash.
    fn modified_backup_files(&self) -> Vec<String>;
}

/// A concrete package record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct Package {
    pub name: String,
    pub version: String,
    pub base: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub packager: Option<String>,
    pub md5sum: Option<String>,
    pub sha256sum: Option<String>,
    pub signature: Option<String>,
    pub arch: Option<String>,
    pub filename: Option<String>,
    pub repository: Option<String>,
    pub has_scriptlet: bool,
    pub reason: InstallReason,
    pub build_date: i64,
    pub install_date: i64,
    pub download_size: i64,
    pub installed_size: i64,
    pub licenses: Vec<String>,
    pub groups: Vec<String>,
    pub depends: Vec<Dependency>,
    pub optdepends: Vec<Dependency>,
    pub conflicts: Vec<Dependency>,
    pub provides: Vec<Dependency>,
    pub replaces: Vec<Dependency>,
    pub files: Vec<String>,
    pub backup: Vec<BackupEntry>,
    pub required_by: Vec<String>,
    pub validation: Vec<Validation>,
    /// Filesystem root the package is installed under; only set for
    /// installed packages.
    pub install_root: Option<Rc<Path>>,
}

impl Package {
    /// Whether this package satisfies a bare name through a provision.
    #[must_use]
    pub fn provides_name(&self, name: &str) -> bool {
        self.provides.iter().any(|p| p.name == name)
    }
}

impl PackageRecord for Package {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    fn packager(&self) -> Option<&str> {
        self.packager.as_deref()
    }

    fn md5sum(&self) -> Option<&str> {
        self.md5sum.as_deref()
    }

    fn sha256sum(&self) -> Option<&str> {
        self.sha256sum.as_deref()
    }

    fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    fn arch(&self) -> Option<&str> {
        self.arch.as_deref()
    }

    fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    fn repository(&self) -> Option<&str> {
        self.repository.as_deref()
    }

    fn has_scriptlet(&self) -> bool {
        self.has_scriptlet
    }

    fn reason(&self) -> InstallReason {
        self.reason
    }

    fn build_date(&self) -> i64 {
        self.build_date
    }

    fn install_date(&self) -> i64 {
        self.install_date
    }

    fn download_size(&self) -> i64 {
        self.download_size
    }

    fn installed_size(&self) -> i64 {
        self.installed_size
    }

    fn licenses(&self) -> &[String] {
        &self.licenses
    }

    fn groups(&self) -> &[String] {
        &self.groups
    }

    fn depends(&self) -> &[Dependency] {
        &self.depends
    }

    fn optdepends(&self) -> &[Dependency] {
        &self.optdepends
    }

    fn conflicts(&self) -> &[Dependency] {
        &self.conflicts
    }

    fn provides(&self) -> &[Dependency] {
        &self.provides
    }

    fn replaces(&self) -> &[Dependency] {
        &self.replaces
    }

    fn files(&self) -> &[String] {
        &self.files
    }

    fn backup(&self) -> &[BackupEntry] {
        &self.backup
    }

    fn required_by(&self) -> &[String] {
        &self.required_by
    }

    fn validation(&self) -> &[Validation] {
        &self.validation
    }

    fn modified_backup_files(&self) -> Vec<String> {
        self.install_root.as_deref().map_or_else(Vec::new, |root| {
            backup::modified_files(&self.backup, root, &backup::Md5File)
        })
    }
}
