//! Tracing setup for the binary.
//!
//! - `LOG_LEVEL` holds the filter directives, e.g. `debug` or
//!   `info,services=trace,lesson_client=debug`.
//! - `LOG_FORMAT=json` switches to structured output; anything else is the
//!   human-readable format.
//!
//! Logs go to stderr so stdout carries only the rendered lesson.

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "info,services=debug";

pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().init(),
        _ => builder.init(),
    }
}
