//! # Runtime events emitted by schedulers, the tracker and the coordinator.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Probe events**: attempt flow of one target (starting, failed, retry scheduled)
//! - **Status events**: human-visible status changes of one target
//! - **Session events**: terminal transitions of the whole wait (all ready, deadline, fatal)
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use readygate::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::ProbeFailed)
//!     .with_target("127.0.0.1:5432")
//!     .with_reason("connection refused")
//!     .with_attempt(3);
//!
//! assert_eq!(ev.kind, EventKind::ProbeFailed);
//! assert_eq!(ev.target.as_deref(), Some("127.0.0.1:5432"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `target`: subscriber name
    /// - `reason`: panic message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `target`: subscriber name
    /// - `reason`: "full" or "closed"
    SubscriberOverflow,

    // === Probe events ===
    /// A probe attempt is starting.
    ///
    /// Sets:
    /// - `target`: target name
    /// - `attempt`: attempt number (1-based, per target)
    ProbeStarting,

    /// A probe attempt did not succeed.
    ///
    /// Sets:
    /// - `target`: target name
    /// - `attempt`: attempt number
    /// - `reason`: probe error message
    ProbeFailed,

    /// Next attempt scheduled after a failure.
    ///
    /// Sets:
    /// - `target`: target name
    /// - `attempt`: failed attempt number
    /// - `delay_ms`: delay before the next attempt
    /// - `reason`: last probe error message
    RetryScheduled,

    // === Status events ===
    /// Tracker status of a target changed.
    ///
    /// Sets:
    /// - `target`: target name
    /// - `reason`: rendered status (`Waiting`, `OK`, `Failed: ...`)
    StatusChanged,

    // === Session events ===
    /// Every target is ready.
    AllReady,

    /// The global deadline elapsed with targets pending.
    ///
    /// Sets:
    /// - `timeout_ms`: configured global timeout
    /// - `reason`: comma-separated unfinished targets
    DeadlineReached,

    /// A target failed with an error its fail-fast policy does not tolerate.
    ///
    /// Sets:
    /// - `target`: target name
    /// - `reason`: probe error message
    FatalFailure,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Rendered target (or subscriber name for subscriber events).
    pub target: Option<Arc<str>>,
    /// Attempt count (starting from 1).
    pub attempt: Option<u32>,
    /// Delay before the next attempt in milliseconds.
    pub delay_ms: Option<u32>,
    /// Global timeout in milliseconds.
    pub timeout_ms: Option<u32>,
    /// Human-readable reason or status.
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            target: None,
            attempt: None,
            delay_ms: None,
            timeout_ms: None,
            reason: None,
        }
    }

    /// Attaches a rendered target.
    #[inline]
    pub fn with_target(mut self, target: impl Into<Arc<str>>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches an attempt count.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a retry delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        self.delay_ms = Some(d.as_millis().min(u128::from(u32::MAX)) as u32);
        self
    }

    /// Attaches the global timeout (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        self.timeout_ms = Some(d.as_millis().min(u128::from(u32::MAX)) as u32);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_target(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_target(subscriber)
            .with_reason(info)
    }

    /// Returns true for session-level terminal events.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind,
            EventKind::AllReady | EventKind::DeadlineReached | EventKind::FatalFailure
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_numbers_increase() {
        let a = Event::new(EventKind::ProbeStarting);
        let b = Event::new(EventKind::ProbeStarting);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn durations_are_saturated_to_u32_millis() {
        let ev = Event::new(EventKind::RetryScheduled).with_delay(Duration::from_secs(u64::MAX));
        assert_eq!(ev.delay_ms, Some(u32::MAX));
    }
}
