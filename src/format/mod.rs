//! The format-directive interpreter.
//!
//! A format string is scanned into [`Segment`](segment::Segment)s and each
//! directive is rendered against one [`PackageRecord`] through the
//! [`registry`]. Rendering never fails: unknown or out-of-corpus tokens
//! render as `?`.
//!
//! Run-wide settings are passed as an immutable [`RenderSettings`]; the one
//! piece of mutable run state, the `%!` counter, is an explicit
//! [`RenderCounter`] the caller threads through every call.

pub mod directive;
pub mod escape;
pub mod list;
pub mod registry;
pub mod segment;
pub mod size;
pub mod time;

use directive::Spec;
use registry::FieldKind;
use segment::{Segment, Segments};
use size::SizeFormat;

use tracing::debug;

use crate::package::{Corpus, PackageRecord};

/// Default delimiter between records.
pub const DEFAULT_DELIM: &str = "\n";
/// Default delimiter between list items.
pub const DEFAULT_LIST_DELIM: &str = "  ";

/// Settings fixed for a whole run.
///
/// Delimiters are stored already escape-decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    /// Emitted after every record that produced output.
    pub record_delim: String,
    /// Emitted between list items.
    pub list_delim: String,
    /// strftime format for timestamps.
    pub time_format: String,
    /// How sizes are rendered.
    pub size_format: SizeFormat,
    /// Render absent values as `None` instead of nothing.
    pub verbose: bool,
    /// Corpus the records come from; decides which tokens are valid.
    pub corpus: Corpus,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            record_delim: DEFAULT_DELIM.to_string(),
            list_delim: DEFAULT_LIST_DELIM.to_string(),
            time_format: time::DEFAULT_TIME_FORMAT.to_string(),
            size_format: SizeFormat::default(),
            verbose: false,
            corpus: Corpus::default(),
        }
    }
}

impl RenderSettings {
    /// Build settings from raw user-supplied delimiters, decoding their
    /// escapes.
    #[must_use]
    pub fn with_raw_delimiters(record_delim: &str, list_delim: &str) -> Self {
        Self {
            record_delim: escape::unescape(record_delim),
            list_delim: escape::unescape(list_delim),
            ..Self::default()
        }
    }
}

/// The `%!` counter, shared by every record rendered in a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderCounter {
    next: i64,
}

impl RenderCounter {
    /// A counter whose first value is `start`.
    #[must_use]
    pub const fn starting_at(start: i64) -> Self {
        Self { next: start }
    }

    /// Return the current value and advance.
    pub const fn advance(&mut self) -> i64 {
        let value = self.next;
        self.next = self.next.saturating_add(1);
        value
    }

    /// The value the next `%!` will render.
    #[must_use]
    pub const fn peek(&self) -> i64 {
        self.next
    }
}

/// Output of rendering one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// Rendered text, including the record delimiter when `written > 0`.
    pub text: String,
    /// Bytes produced by the format string itself, excluding the delimiter.
    pub written: usize,
}

/// Render `format` against one record.
///
/// # Examples
///
/// ```
/// use pkgfmt::format::{RenderCounter, RenderSettings, render};
/// use pkgfmt::package::Package;
///
/// let pkg = Package {
///     name: "bash".to_string(),
///     version: "5.2.026-2".to_string(),
///     ..Package::default()
/// };
/// let mut counter = RenderCounter::default();
/// let out = render("%n %v", &pkg, &RenderSettings::default(), &mut counter);
/// assert_eq!(out.text, "bash 5.2.026-2\n");
/// assert_eq!(out.written, 14);
/// ```
pub fn render(
    format: &str,
    record: &dyn PackageRecord,
    settings: &RenderSettings,
    counter: &mut RenderCounter,
) -> Rendered {
    let mut text = String::with_capacity(format.len());

    for segment in Segments::new(format) {
        match segment {
            Segment::Literal(literal) => text.push_str(literal),
            Segment::Escape(c) => text.push(c),
            Segment::Directive { token, spec } => {
                text.push_str(&render_directive(token, &spec, record, settings, counter));
            }
        }
    }

    let written = text.len();
    if written > 0 {
        text.push_str(&settings.record_delim);
    }
    Rendered { text, written }
}

fn render_directive(
    token: char,
    spec: &Spec,
    record: &dyn PackageRecord,
    settings: &RenderSettings,
    counter: &mut RenderCounter,
) -> String {
    let Some(field) = registry::resolve(token, settings.corpus) else {
        if let Some(field) = registry::lookup(token) {
            debug!(
                "%{token} ({}) is not available for {:?} packages",
                field.name, settings.corpus
            );
        }
        return "?".to_string();
    };

    match field.kind {
        FieldKind::Scalar(extract) => match extract(record) {
            Some(value) => spec.pad(value),
            None => spec.pad(&list::absent(settings)),
        },
        FieldKind::Timestamp(extract) => {
            time::format_timestamp(extract(record), &settings.time_format)
                .unwrap_or_else(|| list::absent(settings))
        }
        FieldKind::Size(extract) => spec.pad(&size::format_size(extract(record), settings.size_format)),
        FieldKind::List(extract) => list::render_list(extract(record), settings),
        FieldKind::Counter => spec.format_int(counter.advance()),
    }
}
