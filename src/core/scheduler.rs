//! # RetryScheduler: drives one target until it resolves.
//!
//! Turns a single-shot [`Probe`] into a unit that keeps retrying until the target is
//! ready, a fail-fast error occurs, or the session cancels it.
//!
//! ## Architecture
//! ```text
//! WaitCoordinator ──► RetryScheduler::run(token)
//!
//! loop {
//!   ├─► stop if token cancelled or deadline reached
//!   ├─► attempt += 1
//!   ├─► run_once() ──► probe.probe()
//!   │       ├─ None (cancelled)        ─► Cancelled
//!   │       ├─ Connected / Found       ─► Ready
//!   │       ├─ Failed(e), e fail-fast  ─► Fatal(e)
//!   │       └─ Failed(e)
//!   │            ├─ tracker: Retrying { attempt, e }
//!   │            ├─ publish RetryScheduled
//!   │            └─ sleep(interval) (cancellable, bounded by the deadline)
//! }
//! ```
//!
//! ## Rules
//! - Attempts run **sequentially** within one scheduler
//! - No attempt starts after cancellation or at/after the deadline
//! - The scheduler writes only `Retrying` statuses; terminal statuses are written
//!   by the coordinator when it accepts the resolution

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        runner::run_once,
        tracker::{TargetStatus, TargetTracker},
    },
    error::ProbeError,
    events::{Bus, Event, EventKind},
    policies::FailFast,
    probes::ProbeRef,
    targets::TargetId,
};

/// Retry parameters shared by every scheduler of a session.
#[derive(Clone, Debug)]
pub struct SchedulerParams {
    /// Fixed pause between attempts.
    pub interval: Duration,
    /// Error kinds that resolve the scheduler as fatal.
    pub fail_fast: FailFast,
    /// Session deadline; no attempt starts at or after it.
    pub deadline: Instant,
}

/// How a scheduler finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The probe succeeded on attempt `attempts`.
    Ready { attempts: u32 },
    /// The probe failed with a fail-fast error.
    Fatal { attempts: u32, error: ProbeError },
    /// Cancelled or out of time; the coordinator decides what it means.
    Cancelled,
}

/// Drives repeated probing of one target.
pub struct RetryScheduler {
    id: TargetId,
    name: Arc<str>,
    probe: ProbeRef,
    params: SchedulerParams,
    tracker: Arc<TargetTracker>,
    bus: Bus,
}

impl RetryScheduler {
    pub fn new(
        id: TargetId,
        probe: ProbeRef,
        params: SchedulerParams,
        tracker: Arc<TargetTracker>,
        bus: Bus,
    ) -> Self {
        let name = Arc::from(probe.target().to_string());
        Self {
            id,
            name,
            probe,
            params,
            tracker,
            bus,
        }
    }

    /// Runs until the target resolves or `token` is cancelled.
    ///
    /// ### Cancellation semantics
    /// `token` is checked at safe points: before each attempt, during the attempt
    /// (the in-flight result is discarded) and during the retry sleep.
    pub async fn run(self, token: CancellationToken) -> (TargetId, Resolution) {
        let resolution = self.drive(&token).await;
        (self.id, resolution)
    }

    async fn drive(&self, token: &CancellationToken) -> Resolution {
        let deadline = self.params.deadline;
        let mut attempt: u32 = 0;

        loop {
            if token.is_cancelled() || Instant::now() >= deadline {
                return Resolution::Cancelled;
            }

            attempt = attempt.saturating_add(1);
            let Some(res) = run_once(self.probe.as_ref(), &self.name, attempt, token, &self.bus).await
            else {
                return Resolution::Cancelled;
            };

            let err = match res.error() {
                None => return Resolution::Ready { attempts: attempt },
                Some(err) if self.params.fail_fast.is_fatal(err) => {
                    return Resolution::Fatal {
                        attempts: attempt,
                        error: err.clone(),
                    };
                }
                Some(err) => err.clone(),
            };

            if token.is_cancelled() {
                return Resolution::Cancelled;
            }
            self.tracker
                .update(
                    self.id,
                    TargetStatus::Retrying {
                        attempt,
                        last_error: Some(err.clone()),
                    },
                )
                .await;

            let delay = self.params.interval;
            self.bus.publish(
                Event::new(EventKind::RetryScheduled)
                    .with_target(Arc::clone(&self.name))
                    .with_attempt(attempt)
                    .with_delay(delay)
                    .with_reason(err.to_string()),
            );

            tokio::select! {
                biased;
                _ = token.cancelled() => return Resolution::Cancelled,
                _ = time::sleep_until(deadline) => return Resolution::Cancelled,
                _ = time::sleep(delay) => {}
            }
        }
    }
}
