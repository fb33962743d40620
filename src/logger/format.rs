use std::fmt;
use std::str::FromStr;

use crate::logger::error::LoggerError;

/// Output format of log records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoggerFormat {
    /// Human-readable single-line records.
    #[default]
    Text,
    /// One JSON object per record.
    Json,
}

impl FromStr for LoggerFormat {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "plain" => Ok(LoggerFormat::Text),
            "json" => Ok(LoggerFormat::Json),
            _ => Err(LoggerError::InvalidFormat(s.to_string())),
        }
    }
}

impl fmt::Display for LoggerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LoggerFormat::Text => "text",
            LoggerFormat::Json => "json",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("text", LoggerFormat::Text)]
    #[case(" JSON ", LoggerFormat::Json)]
    #[case("plain", LoggerFormat::Text)]
    fn parses_known_formats(#[case] input: &str, #[case] expected: LoggerFormat) {
        assert_eq!(input.parse::<LoggerFormat>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_format() {
        assert_eq!(
            "journald".parse::<LoggerFormat>(),
            Err(LoggerError::InvalidFormat("journald".into()))
        );
    }
}
