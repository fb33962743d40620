//! # Process-wide `tracing` setup for the binary.
//!
//! [`logger_init`] installs a global subscriber with an [`EnvFilter`](tracing_subscriber::EnvFilter),
//! an RFC 3339 local-offset timer and either the text or the JSON formatter.
//! The library itself only emits `tracing` records and never installs a subscriber.

mod config;
mod error;
mod format;
mod init;

pub use config::LoggerConfig;
pub use error::LoggerError;
pub use format::LoggerFormat;

/// Installs the global subscriber described by `cfg`.
pub fn logger_init(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    match cfg.format {
        LoggerFormat::Text => init::text(cfg),
        LoggerFormat::Json => init::json(cfg),
    }
}
