use std::io::IsTerminal;

use time::UtcOffset;

use crate::logger::format::LoggerFormat;

/// Logger settings, filled from `--log-level` / `--log-format`.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    /// `EnvFilter` directive, e.g. `info` or `readygate::probe=debug`.
    pub level: String,
    /// Print the record target (`readygate::status`, ...).
    pub with_targets: bool,
    pub use_color: bool,
    /// Offset applied to log timestamps.
    ///
    /// The local offset can only be read while the process is single-threaded, so the
    /// default captures it when the config is built. Build it before starting a runtime.
    pub utc_offset: UtcOffset,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::Text,
            level: "info".to_string(),
            with_targets: false,
            use_color: std::io::stdout().is_terminal(),
            utc_offset: UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC),
        }
    }
}
