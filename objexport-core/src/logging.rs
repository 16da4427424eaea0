//! Logging setup for the objexport binary.
//!
//! Diagnostics always go to stderr. Stdout is reserved for the progress
//! lines and the `--json` result document.

use std::str::FromStr;

use tracing_subscriber::EnvFilter;

use crate::Result;

/// Output format for log records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable single line records
    #[default]
    Text,
    /// One JSON object per record
    Json,
}

impl FromStr for LogFormat {
    type Err = crate::error::ObjExportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(crate::error::ObjExportError::configuration(format!(
                "Unknown log format '{other}' (expected 'text' or 'json')"
            ))),
        }
    }
}

/// Maps verbosity flags to a maximum log level.
///
/// * `verbose` - 0=INFO, 1=DEBUG, 2+=TRACE
/// * `quiet` - if true, only ERROR records are shown
pub const fn level_for(verbose: u8, quiet: bool) -> tracing::Level {
    match (quiet, verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::INFO,
        (false, 1) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    }
}

/// Initializes structured logging based on verbosity level.
///
/// When `RUST_LOG` is set it takes precedence over the verbosity flags.
///
/// # Example
/// ```rust,no_run
/// use objexport_core::logging::{LogFormat, init_logging};
///
/// init_logging(1, false, LogFormat::Text).expect("Failed to initialize logging");
/// ```
pub fn init_logging(verbose: u8, quiet: bool, format: LogFormat) -> Result<()> {
    let level = level_for(verbose, quiet);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_ascii_lowercase()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let initialized = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    initialized.map_err(|e| {
        crate::error::ObjExportError::configuration(format!("Failed to initialize logging: {e}"))
    })
}
