//! Process-wide log subscriber for the scorer binary.
//!
//! `LOG_LEVEL` holds `EnvFilter` directives; when unset the `scoring` target
//! logs at info and `lesson_scorer` at debug. `LOG_FORMAT=json` emits one JSON
//! object per event, anything else the human-readable format. Every event is
//! written to stderr; stdout carries only the report.

use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("LOG_LEVEL")
        .unwrap_or_else(|_| EnvFilter::new("info,scoring=info,lesson_scorer=debug"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    // The json and plain builders are distinct types, so each arm initializes its own.
    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => {
            builder.json().init();
        }
        _ => {
            builder.init();
        }
    }
}
