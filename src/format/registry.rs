//! The closed table of directive tokens.
//!
//! Each token maps to a [`FieldKind`] carrying a typed extractor over
//! [`PackageRecord`], plus the corpora the field is meaningful for.
use std::borrow::Cow;
use std::fmt;

use crate::package::{Corpus, Dependency, PackageRecord, Validation};

/// Extracts a scalar string field.
pub type ScalarFn = for<'a> fn(&'a dyn PackageRecord) -> Option<&'a str>;
/// Extracts a timestamp or size field.
pub type NumberFn = fn(&dyn PackageRecord) -> i64;
/// Extracts the items of a list field; `None` items are skipped.
pub type ListFn = for<'a> fn(&'a dyn PackageRecord) -> Vec<Option<Cow<'a, str>>>;

/// What a directive renders and how its value is extracted.
#[derive(Clone, Copy)]
pub enum FieldKind {
    /// Single string; honors flags and width.
    Scalar(ScalarFn),
    /// Unix timestamp rendered with the time format; ignores flags and width.
    Timestamp(NumberFn),
    /// Byte count rendered with the size format; honors flags and width.
    Size(NumberFn),
    /// Multi-valued field joined with the list delimiter; ignores flags and width.
    List(ListFn),
    /// The run-wide result counter; honors flags and width.
    Counter,
}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Scalar(_) => "Scalar",
            Self::Timestamp(_) => "Timestamp",
            Self::Size(_) => "Size",
            Self::List(_) => "List",
            Self::Counter => "Counter",
        })
    }
}

/// Which corpora a field can be rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// Every corpus.
    Any,
    /// Installed packages only.
    LocalOnly,
    /// Repository and file packages only.
    NonLocal,
}

impl Availability {
    /// Whether a field with this availability renders for `corpus`.
    #[must_use]
    pub const fn allows(self, corpus: Corpus) -> bool {
        match self {
            Self::Any => true,
            Self::LocalOnly => matches!(corpus, Corpus::Local),
            Self::NonLocal => !matches!(corpus, Corpus::Local),
        }
    }
}

/// One registry entry.
#[derive(Debug)]
pub struct Field {
    /// Token character following `%`.
    pub token: char,
    /// Human-readable field name.
    pub name: &'static str,
    /// Field kind and extractor.
    pub kind: FieldKind,
    /// Corpora the field is valid for.
    pub availability: Availability,
}

const fn field(
    token: char,
    name: &'static str,
    kind: FieldKind,
    availability: Availability,
) -> Field {
    Field {
        token,
        name,
        kind,
        availability,
    }
}

fn strings(values: &[String]) -> Vec<Option<Cow<'_, str>>> {
    values.iter().map(|s| Some(Cow::Borrowed(s.as_str()))).collect()
}

fn dep_names(deps: &[Dependency]) -> Vec<Option<Cow<'_, str>>> {
    deps.iter()
        .map(|d| Some(Cow::Borrowed(d.name.as_str())))
        .collect()
}

fn dep_strings(deps: &[Dependency]) -> Vec<Option<Cow<'_, str>>> {
    deps.iter().map(|d| Some(Cow::Owned(d.to_string()))).collect()
}

fn validation(record: &dyn PackageRecord) -> Vec<Option<Cow<'_, str>>> {
    let methods = record.validation();
    if methods.is_empty() {
        return vec![Some(Cow::Borrowed("Unknown"))];
    }
    if methods.contains(&Validation::None) {
        return vec![Some(Cow::Borrowed("None"))];
    }
    methods.iter().map(|v| Some(Cow::Borrowed(v.label()))).collect()
}

/// Every directive token, in no particular order.
pub static FIELDS: [Field; 34] = {
    use Availability::{Any, LocalOnly, NonLocal};
    use FieldKind::{Counter, List, Scalar, Size, Timestamp};
    [
        // scalars
        field('n', "name", Scalar(|p| Some(p.name())), Any),
        field('v', "version", Scalar(|p| Some(p.version())), Any),
        field('e', "base", Scalar(|p| p.base()), Any),
        field('d', "description", Scalar(|p| p.description()), Any),
        field('u', "url", Scalar(|p| p.url()), Any),
        field('p', "packager", Scalar(|p| p.packager()), Any),
        field('s', "md5sum", Scalar(|p| p.md5sum()), Any),
        field('h', "sha256sum", Scalar(|p| p.sha256sum()), Any),
        field('g', "signature", Scalar(|p| p.signature()), NonLocal),
        field('a', "arch", Scalar(|p| p.arch()), Any),
        field('f', "filename", Scalar(|p| p.filename()), NonLocal),
        field('r', "repository", Scalar(|p| p.repository()), Any),
        field(
            'i',
            "has scriptlet",
            Scalar(|p| Some(if p.has_scriptlet() { "yes" } else { "no" })),
            Any,
        ),
        field('w', "install reason", Scalar(|p| Some(p.reason().label())), LocalOnly),
        field('!', "counter", Counter, Any),
        // times
        field('b', "build date", Timestamp(|p| p.build_date()), Any),
        field('l', "install date", Timestamp(|p| p.install_date()), LocalOnly),
        // sizes
        field('k', "download size", Size(|p| p.download_size()), Any),
        field('m', "installed size", Size(|p| p.installed_size()), Any),
        // lists
        field('L', "licenses", List(|p| strings(p.licenses())), Any),
        field('G', "groups", List(|p| strings(p.groups())), Any),
        field('E', "depends (names)", List(|p| dep_names(p.depends())), Any),
        field('D', "depends", List(|p| dep_strings(p.depends())), Any),
        field('O', "optdepends", List(|p| dep_strings(p.optdepends())), Any),
        field('o', "optdepends (names)", List(|p| dep_names(p.optdepends())), Any),
        field('C', "conflicts", List(|p| dep_names(p.conflicts())), Any),
        field('S', "provides (names)", List(|p| dep_names(p.provides())), Any),
        field('P', "provides", List(|p| dep_strings(p.provides())), Any),
        field('R', "replaces", List(|p| dep_names(p.replaces())), Any),
        field(
            'B',
            "backup",
            List(|p| {
                p.backup()
                    .iter()
                    .map(|b| Some(Cow::Borrowed(b.path.as_str())))
                    .collect()
            }),
            Any,
        ),
        field('F', "files", List(|p| strings(p.files())), Any),
        field('N', "required by", List(|p| strings(p.required_by())), Any),
        field('V', "validation", List(validation), LocalOnly),
        field(
            'M',
            "modified backup files",
            List(|p| {
                p.modified_backup_files()
                    .into_iter()
                    .map(|f| Some(Cow::Owned(f)))
                    .collect()
            }),
            LocalOnly,
        ),
    ]
};

/// Look up a token regardless of corpus.
#[must_use]
pub fn lookup(token: char) -> Option<&'static Field> {
    FIELDS.iter().find(|f| f.token == token)
}

/// Look up a token that is valid for `corpus`.
///
/// Returns `None` for unknown tokens and for tokens that only apply to
/// another corpus; both render as `?`.
#[must_use]
pub fn resolve(token: char, corpus: Corpus) -> Option<&'static Field> {
    lookup(token).filter(|f| f.availability.allows(corpus))
}
