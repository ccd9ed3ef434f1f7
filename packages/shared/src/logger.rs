//! Logging setup utilities for the Goji game server.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// The filter covers the library crate and the binary. The log level can be
/// overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `crate_name` - The package name of the library (e.g., "goji-server")
/// * `binary_name` - The name of the binary (e.g., "goji-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use goji_shared::logger::setup_logger;
///
/// setup_logger("goji-server", "goji-server", "debug");
/// ```
pub fn setup_logger(crate_name: &str, binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives(crate_name, binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn default_directives(crate_name: &str, binary_name: &str, level: &str) -> String {
    let crate_target = crate_name.replace('-', "_");
    let binary_target = binary_name.replace('-', "_");
    if crate_target == binary_target {
        format!("{crate_target}={level},tower_http={level}")
    } else {
        format!("{crate_target}={level},{binary_target}={level},tower_http={level}")
    }
}
