use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

static SUBSCRIBER_INIT: std::sync::Once = std::sync::Once::new();

/// Configure and initialize logging for the simulation
pub fn setup_logging() {
    SUBSCRIBER_INIT.call_once(|| {
        // Allow RUST_LOG to override levels; default to info for our crate and warn elsewhere
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("warn,{name}=info", name = env!("CARGO_CRATE_NAME"))));

        let subscriber = Registry::default()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .with(ErrorLayer::default());

        // A test harness may already own the global subscriber
        if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
            eprintln!("Logging already initialized: {e}");
        }
    });
}
