//! Logging infrastructure for diagnostics on stderr.

mod subscriber;

pub use subscriber::{LOG_ENV_VAR, init_subscriber};
