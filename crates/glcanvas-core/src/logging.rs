//! Logging setup.
//!
//! Library code only uses the `tracing` macros; hosts call [`init_logging`] once early in `main`.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Subscriber configuration.
///
/// `env_filter` follows the `EnvFilter` directive syntax
/// (e.g. "info", "glcanvas_runtime_glow=debug,warn").
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub with_ansi: bool,
}

static INIT: Once = Once::new();

/// Installs the global fmt subscriber.
///
/// Idempotent: later calls are ignored, as is a subscriber already installed by the host.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = config
            .env_filter
            .as_deref()
            .and_then(|f| EnvFilter::try_new(f).ok())
            .or_else(|| EnvFilter::try_from_default_env().ok())
            .unwrap_or_else(|| EnvFilter::new("info"));

        let installed = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(config.with_ansi)
            .try_init()
            .is_ok();

        if installed {
            tracing::debug!("logging initialized");
        }
    });
}
