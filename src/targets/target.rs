//! # Target definitions and parsing.
//!
//! TCP targets are written as `host:port`; IPv6 literals may be bracketed (`[::1]:80`).
//! File targets are plain paths.
//!
//! ## Rules
//! - `1 <= port <= 65535`
//! - `host` must be non-empty; no resolution happens here
//! - file paths must be non-empty; no existence check happens here

use std::fmt;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

/// Position of a target in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub usize);

/// One polling unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    /// A TCP endpoint that must accept a connection.
    Tcp { host: String, port: u16 },
    /// A filesystem path that must exist.
    File { path: PathBuf },
}

/// Invalid target specification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TargetParseError {
    #[error("Invalid host specification: {0}")]
    InvalidSpec(String),
    #[error("Invalid port: {0}")]
    InvalidPort(String),
    #[error("Empty file path")]
    EmptyPath,
}

impl Target {
    /// Creates a TCP target.
    pub fn tcp(host: impl Into<String>, port: u16) -> Self {
        Target::Tcp {
            host: host.into(),
            port,
        }
    }

    /// Creates a file target.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Target::File { path: path.into() }
    }

    /// Parses a `host:port` specification.
    ///
    /// # Example
    /// ```
    /// use readygate::Target;
    ///
    /// let t = Target::parse_tcp("db.internal:5432").unwrap();
    /// assert_eq!(t, Target::tcp("db.internal", 5432));
    /// ```
    pub fn parse_tcp(spec: &str) -> Result<Self, TargetParseError> {
        let invalid = || TargetParseError::InvalidSpec(spec.to_string());

        let (host, port) = spec.trim().rsplit_once(':').ok_or_else(invalid)?;
        if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);
        if host.is_empty() {
            return Err(invalid());
        }

        let port = match port.parse::<u16>() {
            Ok(p) if p > 0 => p,
            _ => return Err(TargetParseError::InvalidPort(port.to_string())),
        };
        Ok(Target::tcp(host, port))
    }

    /// Builds a file target, rejecting empty paths.
    pub fn parse_file(path: &str) -> Result<Self, TargetParseError> {
        if path.trim().is_empty() {
            return Err(TargetParseError::EmptyPath);
        }
        Ok(Target::file(path))
    }

    /// Returns the host if this is a TCP target whose host is not an IP literal.
    pub fn unresolved_host(&self) -> Option<&str> {
        match self {
            Target::Tcp { host, .. } if host.parse::<IpAddr>().is_err() => Some(host),
            _ => None,
        }
    }

    /// Returns the path of a file target.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Target::File { path } => Some(path),
            Target::Tcp { .. } => None,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Tcp { host, port } if host.contains(':') => write!(f, "[{host}]:{port}"),
            Target::Tcp { host, port } => write!(f, "{host}:{port}"),
            Target::File { path } => write!(f, "{}", path.display()),
        }
    }
}

impl FromStr for Target {
    type Err = TargetParseError;

    /// Parses `file:<path>` as a file target and anything else as `host:port`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix("file:") {
            Some(path) => Target::parse_file(path),
            None => Target::parse_tcp(s),
        }
    }
}
