use crate::config::Config;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter outside production: relay branches at debug, axum's
/// extractor rejections (oversized or unreadable bodies) at trace.
const DEV_FILTER: &str = "relay_server=debug,axum::rejection=trace,reqwest=info";

/// Installs the global subscriber for the relay.
///
/// `APP_ENV=production` gets JSON lines at `info` for log collectors; any other
/// environment gets human-readable output. `RUST_LOG` overrides both filters.
/// Call once, after configuration has loaded.
pub fn setup_tracing(config: &Config) {
    let is_production = config.is_production();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if is_production {
            EnvFilter::new("info")
        } else {
            EnvFilter::new(DEV_FILTER)
        }
    });

    let registry = tracing_subscriber::registry().with(filter);

    if is_production {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry.with(fmt::layer().with_target(false)).init();
    }
}
