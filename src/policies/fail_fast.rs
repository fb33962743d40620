//! # Fail-fast policy.
//!
//! [`FailFast`] names the probe error kinds that end the whole session at once
//! instead of being retried until the global deadline.
//!
//! | Policy                          | Refused | Timeout | Not found | OS error |
//! |---------------------------------|---------|---------|-----------|----------|
//! | `FailFast::default()`           | retry   | retry   | retry     | fatal    |
//! | `FailFast::none()`              | retry   | retry   | retry     | retry    |
//! | `"refused,error".parse()`       | fatal   | retry   | retry     | fatal    |

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{ProbeError, ProbeErrorKind};

/// Set of probe error kinds treated as fatal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailFast {
    kinds: BTreeSet<ProbeErrorKind>,
}

impl FailFast {
    /// Retry every error kind; only the global deadline ends the session.
    pub fn none() -> Self {
        Self {
            kinds: BTreeSet::new(),
        }
    }

    /// Treats exactly the given kinds as fatal.
    pub fn on(kinds: impl IntoIterator<Item = ProbeErrorKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
        }
    }

    /// Returns true if `err` must end the session.
    pub fn is_fatal(&self, err: &ProbeError) -> bool {
        self.kinds.contains(&err.kind())
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl Default for FailFast {
    /// OS-level errors are fatal; refusals, timeouts and missing files are retried.
    fn default() -> Self {
        Self::on([ProbeErrorKind::Os])
    }
}

impl fmt::Display for FailFast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kinds.is_empty() {
            return f.write_str("none");
        }
        let names: Vec<&str> = self.kinds.iter().map(ProbeErrorKind::as_str).collect();
        f.write_str(&names.join(","))
    }
}

impl FromStr for FailFast {
    type Err = String;

    /// Parses a comma-separated list of kinds, or `none`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("none") || s.is_empty() {
            return Ok(Self::none());
        }
        let kinds = s
            .split(',')
            .map(str::parse::<ProbeErrorKind>)
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self { kinds })
    }
}
