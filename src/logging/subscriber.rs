//! Tracing subscriber setup: console formatter and initialisation.
use std::io::IsTerminal as _;

/// Environment variable holding an `EnvFilter` directive that overrides the
/// default level.
pub const LOG_ENV_VAR: &str = "PKGFMT_LOG";

/// Extracts the `message` field from a [`tracing::Event`].
#[derive(Default)]
struct MessageExtractor {
    message: String,
}

impl tracing::field::Visit for MessageExtractor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

/// A [`tracing_subscriber::fmt::FormatEvent`] that prefixes each message
/// with its level, in the style of pacman's own diagnostics.
pub(super) struct PkgfmtFormatter {
    ansi: bool,
}

impl PkgfmtFormatter {
    pub(super) const fn new(ansi: bool) -> Self {
        Self { ansi }
    }

    const fn tag(&self, level: tracing::Level) -> &'static str {
        match (level, self.ansi) {
            (tracing::Level::ERROR, true) => "\x1b[1;31merror:\x1b[0m",
            (tracing::Level::ERROR, false) => "error:",
            (tracing::Level::WARN, true) => "\x1b[1;33mwarning:\x1b[0m",
            (tracing::Level::WARN, false) => "warning:",
            (tracing::Level::INFO, _) => "info:",
            (_, true) => "\x1b[2mdebug:\x1b[0m",
            (_, false) => "debug:",
        }
    }
}

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for PkgfmtFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);
        writeln!(
            writer,
            "{} {}",
            self.tag(*event.metadata().level()),
            extractor.message
        )
    }
}

/// Build the level filter: `PKGFMT_LOG` if set and valid, otherwise `warn`,
/// or `debug` when `verbose`.
pub(super) fn env_filter(verbose: bool) -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "debug" } else { "warn" };
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default))
}

/// Initialise the global [`tracing`] subscriber.
///
/// All events go to stderr; stdout carries only rendered records. Must be
/// called once at program startup, before any logging.
pub fn init_subscriber(verbose: bool) {
    use tracing_subscriber::{Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

    let console_layer = fmt::layer()
        .event_format(PkgfmtFormatter::new(std::io::stderr().is_terminal()))
        .with_writer(std::io::stderr)
        .with_filter(env_filter(verbose));

    tracing_subscriber::registry().with(console_layer).init();
}
