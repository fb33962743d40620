//! Error types used by the readygate runtime and its probes.
//!
//! This module defines the error taxonomy of a wait session:
//!
//! - [`ProbeError`] - why a single probe attempt did not succeed.
//! - [`ProbeErrorKind`] - the payload-free class of a [`ProbeError`], used by fail-fast policies.
//! - [`WaitError`] - terminal failures surfaced to the caller, each with its own exit code.
//!
//! All types provide helper methods (`as_label`, `as_message`) for logging.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::targets::Target;

/// Exit code for successful completion.
pub const EXIT_OK: i32 = 0;
/// Exit code for invalid targets or flags.
pub const EXIT_MISCONFIGURATION: i32 = 2;
/// Exit code for fatal probe errors and failed handoffs.
pub const EXIT_RUNTIME: i32 = 3;
/// Exit code for a global timeout with unready targets.
pub const EXIT_TIMEOUT: i32 = 4;

/// # Why a single probe attempt failed.
///
/// `Refused`, `TimedOut` and `NotFound` are the expected transient results while a
/// dependency is still starting. `Os` carries any other operating-system error.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The remote host actively refused the connection.
    #[error("connection refused")]
    Refused,

    /// The connect attempt did not complete within the per-attempt timeout.
    #[error("connect timed out")]
    TimedOut,

    /// The file does not exist (or is not visible to us yet).
    #[error("not found")]
    NotFound,

    /// Any other OS-level error.
    #[error("{0}")]
    Os(String),
}

impl ProbeError {
    /// Returns the payload-free class of this error.
    pub fn kind(&self) -> ProbeErrorKind {
        match self {
            ProbeError::Refused => ProbeErrorKind::Refused,
            ProbeError::TimedOut => ProbeErrorKind::TimedOut,
            ProbeError::NotFound => ProbeErrorKind::NotFound,
            ProbeError::Os(_) => ProbeErrorKind::Os,
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use readygate::ProbeError;
    ///
    /// assert_eq!(ProbeError::Refused.as_label(), "probe_refused");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ProbeError::Refused => "probe_refused",
            ProbeError::TimedOut => "probe_timeout",
            ProbeError::NotFound => "probe_not_found",
            ProbeError::Os(_) => "probe_os_error",
        }
    }

    /// Converts an I/O error from a connect attempt into a probe error.
    pub(crate) fn from_connect(err: &std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::ConnectionRefused => ProbeError::Refused,
            std::io::ErrorKind::TimedOut => ProbeError::TimedOut,
            _ => ProbeError::Os(err.to_string()),
        }
    }
}

/// Class of a [`ProbeError`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProbeErrorKind {
    Refused,
    TimedOut,
    NotFound,
    Os,
}

impl ProbeErrorKind {
    /// All kinds, in declaration order.
    pub const ALL: [ProbeErrorKind; 4] = [
        ProbeErrorKind::Refused,
        ProbeErrorKind::TimedOut,
        ProbeErrorKind::NotFound,
        ProbeErrorKind::Os,
    ];

    /// Name accepted by [`FromStr`] and printed by [`Display`](fmt::Display).
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeErrorKind::Refused => "refused",
            ProbeErrorKind::TimedOut => "timeout",
            ProbeErrorKind::NotFound => "not_found",
            ProbeErrorKind::Os => "error",
        }
    }
}

impl fmt::Display for ProbeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProbeErrorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "refused" => Ok(ProbeErrorKind::Refused),
            "timeout" | "timed_out" => Ok(ProbeErrorKind::TimedOut),
            "not_found" | "missing" => Ok(ProbeErrorKind::NotFound),
            "error" | "os" => Ok(ProbeErrorKind::Os),
            other => Err(format!(
                "unknown probe error kind `{other}` (expected: refused|timeout|not_found|error)"
            )),
        }
    }
}

/// # Terminal failures of a wait session.
///
/// Every variant maps to a distinct process exit code so calling scripts can
/// branch on the failure cause.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum WaitError {
    /// Invalid configuration detected before any probing started.
    #[error("{0}")]
    Misconfiguration(String),

    /// The global deadline elapsed with targets still unready.
    #[error("timeout occurred; unready: {}", join_targets(.unfinished))]
    Timeout {
        /// Targets that never became ready, in registration order.
        unfinished: Vec<Target>,
    },

    /// A probe reported an error its fail-fast policy does not tolerate.
    #[error("{target} failed: {reason}")]
    Fatal {
        /// The offending target.
        target: Target,
        /// The underlying probe error.
        reason: ProbeError,
    },

    /// All targets were ready but the success handoff failed.
    #[error("handoff failed: {0}")]
    Handoff(#[from] crate::completion::HandoffError),
}

impl WaitError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            WaitError::Misconfiguration(_) => EXIT_MISCONFIGURATION,
            WaitError::Timeout { .. } => EXIT_TIMEOUT,
            WaitError::Fatal { .. } | WaitError::Handoff(_) => EXIT_RUNTIME,
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use readygate::WaitError;
    ///
    /// let err = WaitError::Timeout { unfinished: vec![] };
    /// assert_eq!(err.as_label(), "wait_timeout");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            WaitError::Misconfiguration(_) => "wait_misconfiguration",
            WaitError::Timeout { .. } => "wait_timeout",
            WaitError::Fatal { .. } => "wait_fatal",
            WaitError::Handoff(_) => "wait_handoff_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            WaitError::Misconfiguration(msg) => format!("misconfiguration: {msg}"),
            WaitError::Timeout { unfinished } => {
                format!("timeout occurred; unready targets=[{}]", join_targets(unfinished))
            }
            WaitError::Fatal { target, reason } => {
                format!("connection to {target} failed: {reason}")
            }
            WaitError::Handoff(e) => format!("handoff: {e}"),
        }
    }
}

pub(crate) fn join_targets(targets: &[Target]) -> String {
    targets
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_errors_are_classified() {
        let refused = std::io::Error::from(std::io::ErrorKind::ConnectionRefused);
        assert_eq!(ProbeError::from_connect(&refused), ProbeError::Refused);

        let other = std::io::Error::other("network is unreachable");
        assert_eq!(
            ProbeError::from_connect(&other),
            ProbeError::Os("network is unreachable".into())
        );
    }

    #[test]
    fn kind_names_parse_back() {
        for kind in ProbeErrorKind::ALL {
            assert_eq!(kind.as_str().parse::<ProbeErrorKind>(), Ok(kind));
        }
        assert!("bogus".parse::<ProbeErrorKind>().is_err());
    }

    #[test]
    fn exit_codes_are_distinct_per_kind() {
        let timeout = WaitError::Timeout { unfinished: vec![] };
        let fatal = WaitError::Fatal {
            target: Target::file("/tmp/x"),
            reason: ProbeError::Os("boom".into()),
        };
        let misconfig = WaitError::Misconfiguration("no targets".into());

        assert_eq!(timeout.exit_code(), EXIT_TIMEOUT);
        assert_eq!(fatal.exit_code(), EXIT_RUNTIME);
        assert_eq!(misconfig.exit_code(), EXIT_MISCONFIGURATION);
    }

    #[test]
    fn timeout_message_lists_targets() {
        let err = WaitError::Timeout {
            unfinished: vec![Target::tcp("127.0.0.1", 9), Target::file("/tmp/ready.flag")],
        };
        assert_eq!(
            err.to_string(),
            "timeout occurred; unready: 127.0.0.1:9, /tmp/ready.flag"
        );
    }
}
