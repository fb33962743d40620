//! # CompletionHandler: acts on the committed outcome.
//!
//! `complete` consumes the handler, so the handoff can run at most once.
//!
//! ```text
//! Success          ─► handoff.hand_off() ─► Ok(exit code) | Err(Handoff)
//! Timeout { .. }   ─► log unready targets ─► Err(WaitError::Timeout)
//! Fatal { .. }     ─► log target + error  ─► Err(WaitError::Fatal)
//! ```

use tracing::error;

use crate::completion::{AnnounceReady, Handoff};
use crate::core::Outcome;
use crate::error::{WaitError, join_targets};

/// Invokes the success handoff or surfaces the failure.
pub struct CompletionHandler {
    handoff: Box<dyn Handoff>,
}

impl Default for CompletionHandler {
    fn default() -> Self {
        Self::new(Box::new(AnnounceReady))
    }
}

impl CompletionHandler {
    pub fn new(handoff: Box<dyn Handoff>) -> Self {
        Self { handoff }
    }

    /// Acts on `outcome`. Returns the exit code of a successful handoff.
    pub fn complete(self, outcome: Outcome) -> Result<i32, WaitError> {
        match outcome {
            Outcome::Success => Ok(self.handoff.hand_off()?),
            Outcome::Timeout { unfinished } => {
                error!(
                    target: "readygate::completion",
                    unready = %join_targets(&unfinished),
                    "Timeout occurred."
                );
                Err(WaitError::Timeout { unfinished })
            }
            Outcome::Fatal { target, reason } => {
                error!(
                    target: "readygate::completion",
                    kind = reason.as_label(),
                    "Connection to {target} failed: {reason}"
                );
                Err(WaitError::Fatal { target, reason })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::{HandoffError, HandoffFn};
    use crate::error::{EXIT_RUNTIME, EXIT_TIMEOUT, ProbeError};
    use crate::targets::Target;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn counting(calls: Arc<AtomicU32>, code: i32) -> CompletionHandler {
        CompletionHandler::new(Box::new(HandoffFn::new(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(code)
        })))
    }

    #[test]
    fn success_runs_handoff_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let code = counting(calls.clone(), 7).complete(Outcome::Success).unwrap();
        assert_eq!(code, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn timeout_skips_handoff() {
        let calls = Arc::new(AtomicU32::new(0));
        let err = counting(calls.clone(), 0)
            .complete(Outcome::Timeout {
                unfinished: vec![Target::tcp("127.0.0.1", 9)],
            })
            .unwrap_err();

        assert_eq!(err.exit_code(), EXIT_TIMEOUT);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn fatal_is_a_runtime_error() {
        let err = CompletionHandler::default()
            .complete(Outcome::Fatal {
                target: Target::tcp("db", 5432),
                reason: ProbeError::Os("no route to host".into()),
            })
            .unwrap_err();
        assert_eq!(err.exit_code(), EXIT_RUNTIME);
        assert_eq!(err.to_string(), "db:5432 failed: no route to host");
    }

    #[test]
    fn failed_handoff_is_a_runtime_error() {
        let handler = CompletionHandler::new(Box::new(HandoffFn::new(|| {
            Err(HandoffError::Custom("exec failed".into()))
        })));
        let err = handler.complete(Outcome::Success).unwrap_err();
        assert!(matches!(err, WaitError::Handoff(_)));
        assert_eq!(err.exit_code(), EXIT_RUNTIME);
    }
}
