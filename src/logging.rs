//! Tracing subscriber setup for host processes.

use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static SUBSCRIBER_INIT: std::sync::Once = std::sync::Once::new();

/// Installs the global tracing subscriber for a host process.
///
/// `RUST_LOG` overrides the filter; by default this crate logs at info and everything else at
/// warn. Safe to call more than once.
pub fn setup_logging() {
    SUBSCRIBER_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("warn,{name}=info", name = env!("CARGO_CRATE_NAME"))));

        let result = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).compact())
            .with(ErrorLayer::default())
            .try_init();

        if let Err(error) = result {
            eprintln!("Failed to install tracing subscriber: {error}");
        }
    });
}
