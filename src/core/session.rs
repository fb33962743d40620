//! # Wait session: targets, deadline, and the write-once outcome.
//!
//! ## Rules
//! - The deadline is absolute: `start + timeout`, fixed at creation; a timeout too
//!   large for the clock yields a deadline decades away instead of a panic
//! - The first [`WaitSession::commit`] wins; later commits are no-ops returning `false`
//! - A committed [`Outcome`] is never modified

use std::sync::OnceLock;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::{ProbeError, WaitError};
use crate::targets::Target;

/// Final result of a wait session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every target became ready.
    Success,
    /// The deadline elapsed; `unfinished` lists the targets that never became ready.
    Timeout { unfinished: Vec<Target> },
    /// A target failed with an error its fail-fast policy does not tolerate.
    Fatal { target: Target, reason: ProbeError },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    /// Converts a failed outcome into the matching [`WaitError`].
    pub fn into_result(self) -> Result<(), WaitError> {
        match self {
            Outcome::Success => Ok(()),
            Outcome::Timeout { unfinished } => Err(WaitError::Timeout { unfinished }),
            Outcome::Fatal { target, reason } => Err(WaitError::Fatal { target, reason }),
        }
    }
}

/// Stand-in deadline when `start + timeout` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Root object of one invocation.
#[derive(Debug)]
pub struct WaitSession {
    targets: Vec<Target>,
    started: Instant,
    deadline: Instant,
    outcome: OnceLock<Outcome>,
}

impl WaitSession {
    /// Starts a session now with the given global timeout.
    pub fn new(targets: Vec<Target>, timeout: Duration) -> Self {
        let started = Instant::now();
        Self {
            targets,
            started,
            deadline: deadline_after(started, timeout),
            outcome: OnceLock::new(),
        }
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Commits the outcome if none was committed yet.
    pub fn commit(&self, outcome: Outcome) -> bool {
        self.outcome.set(outcome).is_ok()
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.get()
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.get().is_some()
    }
}

pub(crate) fn deadline_after(start: Instant, timeout: Duration) -> Instant {
    start
        .checked_add(timeout)
        .unwrap_or_else(|| start + FAR_FUTURE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_commit_wins() {
        let session = WaitSession::new(vec![Target::tcp("127.0.0.1", 9)], Duration::from_secs(1));
        assert!(!session.is_finished());

        assert!(session.commit(Outcome::Success));
        assert!(!session.commit(Outcome::Timeout {
            unfinished: vec![Target::tcp("127.0.0.1", 9)],
        }));
        assert_eq!(session.outcome(), Some(&Outcome::Success));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_is_start_plus_timeout() {
        let before = Instant::now();
        let session = WaitSession::new(Vec::new(), Duration::from_secs(10));
        assert_eq!(session.deadline(), before + Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn huge_timeout_does_not_overflow() {
        let before = Instant::now();
        let session = WaitSession::new(vec![Target::tcp("127.0.0.1", 9)], Duration::from_secs(u64::MAX));
        assert!(session.deadline() >= before + FAR_FUTURE);
        assert!(!session.is_finished());
    }

    #[tokio::test]
    async fn concurrent_commits_store_one_outcome() {
        let session = std::sync::Arc::new(WaitSession::new(Vec::new(), Duration::from_secs(1)));
        let mut set = tokio::task::JoinSet::new();
        for i in 0..16u16 {
            let session = session.clone();
            set.spawn(async move {
                let outcome = if i % 2 == 0 {
                    Outcome::Success
                } else {
                    Outcome::Timeout {
                        unfinished: vec![Target::tcp("127.0.0.1", i + 1)],
                    }
                };
                session.commit(outcome)
            });
        }

        let mut won = 0;
        while let Some(first) = set.join_next().await {
            if first.unwrap() {
                won += 1;
            }
        }
        assert_eq!(won, 1);
        let stored = session.outcome().cloned().unwrap();
        assert!(!session.commit(Outcome::Success));
        assert_eq!(session.outcome(), Some(&stored));
    }

    #[test]
    fn failed_outcomes_map_to_errors() {
        let fatal = Outcome::Fatal {
            target: Target::file("/x"),
            reason: ProbeError::Os("boom".into()),
        };
        assert!(matches!(fatal.into_result(), Err(WaitError::Fatal { .. })));
        assert!(Outcome::Success.into_result().is_ok());
    }
}
