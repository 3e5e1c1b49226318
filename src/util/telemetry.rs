//! Tracing subscriber setup for the headless driver and embedding applications.

use std::sync::OnceLock;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_DIRECTIVE: &str = "specview=info";

static TELEMETRY_INIT: OnceLock<bool> = OnceLock::new();

/// Installs the global subscriber once. Returns whether this process owns it.
pub fn init() -> bool {
    *TELEMETRY_INIT.get_or_init(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(DEFAULT_DIRECTIVE))
            .unwrap_or_else(|_| EnvFilter::default().add_directive(Level::INFO.into()));

        match fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_thread_names(true)
            .compact()
            .try_init()
        {
            Ok(()) => {
                tracing::debug!(
                    "[telemetry] subscriber installed (specview {})",
                    env!("CARGO_PKG_VERSION")
                );
                true
            }
            Err(err) => {
                eprintln!("[telemetry] failed to initialise tracing subscriber: {err}");
                false
            }
        }
    })
}
