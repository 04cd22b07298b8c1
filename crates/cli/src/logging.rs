//! Logging setup
//!
//! stdout belongs to the relayed child output, so every log line goes to stderr.

use std::io::IsTerminal;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "childtee=warn";

/// Initialize the global tracing subscriber
///
/// # Environment Variables
///
/// - `RUST_LOG`: filter directives (default: `childtee=warn`)
/// - `CHILDTEE_LOG_FORMAT`: `json` for structured output, anything else for pretty
///
/// # Example
///
/// ```text
/// RUST_LOG=childtee=debug CHILDTEE_LOG_FORMAT=json \
///     childtee -- ./test.sh
/// ```
pub fn init_logging() {
    let log_format = std::env::var("CHILDTEE_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .pretty()
                        .with_ansi(std::io::stderr().is_terminal())
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }
}
