//!
//! Logger setup.
//!

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::config::{Log, LogFormat};

/// Install the global tracing subscriber from the log config.
///
/// The filtering directive takes precedence over the plain level; both can
/// still be overridden at runtime through `RUST_LOG`. Safe to call once per
/// process; later calls are no-ops.
pub fn setup(config: &Log) {
    if !config.console.enabled {
        return;
    }

    let directive = config
        .console
        .filtering_directive
        .clone()
        .unwrap_or_else(|| config.console.level.into_level().to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.console.log_format {
        LogFormat::Default => registry.with(fmt::layer()).try_init(),
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
    };
    // A subscriber may already be installed (tests, embedding applications);
    // that is fine.
    let _ = result;
}
