//! Tracing initialization and subscriber setup.

use super::file_writer::RotatingFileWriter;
use crate::infrastructure::paths;
use crate::Config;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LEVEL: &str = "info";

/// Installs the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set, otherwise from
/// `config.trace_level`, otherwise `"info"`. Output goes to stderr, or to a
/// size-rotated file (10 MB, 3 backups) when `config.log_file` is set; a
/// relative log path is placed under `config.data_dir`.
///
/// Idempotent: only the first call installs a subscriber. Failures are
/// swallowed, since logging must never stop the application from starting.
///
/// # Example
///
/// ```rust
/// use marketdir::observability::init_tracing;
/// use marketdir::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(config.trace_level.as_deref().unwrap_or(DEFAULT_LEVEL))
    });
    let registry = tracing_subscriber::registry().with(filter);

    let Some(log_file) = &config.log_file else {
        let _ = registry.with(fmt::layer().with_writer(std::io::stderr)).try_init();
        return;
    };

    let path = paths::resolve_in(&config.data_dir, log_file);
    if let Some(parent) = path.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            return;
        }
    }

    let writer = Arc::new(RotatingFileWriter::new(path));
    let _ = registry
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .try_init();
}
