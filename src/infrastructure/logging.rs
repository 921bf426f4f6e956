use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Diagnostics output configuration for a host application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// "trace", "debug", "info", "warn", or "error"; overridden by
    /// `RUST_LOG` when set.
    pub level: String,
    pub console: bool,
    pub file: bool,
    pub dir: String,
    pub file_name_prefix: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console: true,
            file: false,
            dir: "logs".to_string(),
            file_name_prefix: "kb1_configurator".to_string(),
        }
    }
}

pub struct LoggingGuard {
    // We need to keep this guard alive for file logs to be flushed
    _guards: Vec<WorkerGuard>,
}

pub fn init_logger(config: &LogConfig) -> anyhow::Result<LoggingGuard> {
    let mut guards = Vec::new();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::from_str(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = config
        .console
        .then(|| fmt::layer().with_writer(std::io::stdout));

    let file_layer = if config.file {
        let appender = tracing_appender::rolling::daily(&config.dir, &config.file_name_prefix);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        guards.push(guard);
        Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    tracing::info!("logging initialized");

    Ok(LoggingGuard { _guards: guards })
}
