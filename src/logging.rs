//! Logger initialization.
//!
//! The crate logs through the `log` facade only; applications that already
//! install a logger can skip this module.

use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` uses `env_logger` filter syntax, e.g.
/// `"quad_batch_renderer=debug,warn"`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter directives; `RUST_LOG` applies when unset.
    pub env_filter: Option<String>,
    /// Whether to emit ANSI colors.
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Install `env_logger` as the global logger.
///
/// The filter comes from `config`, then `RUST_LOG`, then defaults to
/// `info`. Only the first call has any effect, and a logger installed by
/// someone else is left in place.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder.write_style(config.write_style);

        if builder.try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}
