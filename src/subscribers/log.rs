//! # Logging subscriber.
//!
//! [`LogWriter`] turns runtime events into `tracing` records.
//!
//! ## Output format
//! ```text
//! INFO  readygate::status: 127.0.0.1:5432 | Retrying (attempt 2): connection refused
//! INFO  readygate::status: /tmp/ready.flag | OK
//! DEBUG readygate::probe: probe starting dependency=127.0.0.1:5432 attempt=3
//! DEBUG readygate::probe: retry scheduled dependency=127.0.0.1:5432 delay_ms=1000 after_attempt=2
//! WARN  readygate::session: deadline reached timeout_ms=10000 unfinished=127.0.0.1:5432
//! ```

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Subscriber that writes every event through `tracing`.
///
/// Status changes are logged at `info` as `<target> | <status>`;
/// per-attempt chatter is logged at `debug`.
#[derive(Debug, Default)]
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let target = e.target.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("");

        match e.kind {
            EventKind::StatusChanged => {
                info!(target: "readygate::status", "{target} | {reason}");
            }
            EventKind::ProbeStarting => {
                debug!(target: "readygate::probe", dependency = %target, attempt = ?e.attempt, "probe starting");
            }
            EventKind::ProbeFailed => {
                debug!(target: "readygate::probe", dependency = %target, attempt = ?e.attempt, err = %reason, "probe failed");
            }
            EventKind::RetryScheduled => {
                debug!(
                    target: "readygate::probe",
                    dependency = %target,
                    delay_ms = ?e.delay_ms,
                    after_attempt = ?e.attempt,
                    "retry scheduled"
                );
            }
            EventKind::AllReady => {
                info!(target: "readygate::session", "all targets ready");
            }
            EventKind::DeadlineReached => {
                warn!(target: "readygate::session", timeout_ms = ?e.timeout_ms, unfinished = %reason, "deadline reached");
            }
            EventKind::FatalFailure => {
                error!(target: "readygate::session", dependency = %target, err = %reason, "fatal probe error");
            }
            EventKind::SubscriberOverflow => {
                warn!(target: "readygate::events", subscriber = %target, reason = %reason, "subscriber dropped event");
            }
            EventKind::SubscriberPanicked => {
                error!(target: "readygate::events", subscriber = %target, info = %reason, "subscriber panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
