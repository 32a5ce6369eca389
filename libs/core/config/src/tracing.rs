use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, prelude::*};

/// Log directives used when `RUST_LOG` is unset
pub fn default_directives(environment: &Environment) -> &'static str {
    match environment {
        Environment::Production => "info,tower_http=info,mongodb=warn",
        Environment::Development => "debug,tower_http=debug,mongodb=info,hyper=info",
    }
}

/// Install the color-eyre panic and error report hooks.
///
/// Reports show the error location but omit the environment section.
/// A second install is ignored.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Install the global subscriber.
///
/// Production writes flattened JSON events, development writes the pretty
/// multi-line format. Both carry a `tracing_error::ErrorLayer` so eyre
/// reports include the active span trace. `RUST_LOG` overrides
/// [`default_directives`].
///
/// Calling it again once a subscriber is set only logs at debug level,
/// which keeps tests that share a process quiet.
pub fn init_tracing(environment: &Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(environment)));

    let result = if environment.is_production() {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    match result {
        Ok(()) => info!(?environment, "Tracing initialized"),
        Err(_) => debug!("Global subscriber already set"),
    }
}
