//! Logging setup.

use crate::config::env_vars;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, compact lines.
    Compact,
    /// One JSON object per event, for containers.
    Json,
}

impl LogFormat {
    /// JSON when `TWINLINK_LOG_JSON=true`, compact otherwise.
    pub fn from_env() -> Self {
        let json = std::env::var(env_vars::LOG_JSON)
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);
        if json {
            LogFormat::Json
        } else {
            LogFormat::Compact
        }
    }
}

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins over `verbose`. Calling this twice is harmless; the second
/// call leaves the first subscriber in place.
pub fn init(verbose: bool, format: LogFormat) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "twinlink={level},twinlink_core={level},twinlink_placeholders={level}",
            level = default_level
        ))
        .add_directive(tracing::Level::WARN.into())
    });

    let result = match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .try_init(),
        LogFormat::Compact => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
