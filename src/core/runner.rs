//! # Run a single probe attempt.
//!
//! Executes one attempt of a [`Probe`] under cancellation and publishes the attempt
//! events to the [`Bus`].
//!
//! ## Event flow
//! ```text
//! publish ProbeStarting → probe.probe() → ready            → (nothing; resolution is reported upstream)
//!                                       → failed(err)      → publish ProbeFailed
//!                       → token cancelled first            → result dropped, None
//! ```
//!
//! ## Rules
//! - Cancellation wins over a result that is ready in the same poll
//! - A cancelled attempt publishes nothing after `ProbeStarting`

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::events::{Bus, Event, EventKind};
use crate::probes::{Probe, ProbeResult};

/// Executes one attempt of `probe`.
///
/// Returns `None` if `token` was cancelled before the attempt finished. The
/// in-flight future is dropped, which closes any half-open socket.
pub async fn run_once<P: Probe + ?Sized>(
    probe: &P,
    name: &Arc<str>,
    attempt: u32,
    token: &CancellationToken,
    bus: &Bus,
) -> Option<ProbeResult> {
    bus.publish(
        Event::new(EventKind::ProbeStarting)
            .with_target(Arc::clone(name))
            .with_attempt(attempt),
    );

    let res = tokio::select! {
        biased;
        _ = token.cancelled() => return None,
        res = probe.probe() => res,
    };

    if let Some(err) = res.error() {
        bus.publish(
            Event::new(EventKind::ProbeFailed)
                .with_target(Arc::clone(name))
                .with_attempt(attempt)
                .with_reason(err.to_string()),
        );
    }
    Some(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProbeError;
    use crate::probes::ProbeFn;
    use crate::targets::Target;
    use std::time::Duration;

    #[tokio::test]
    async fn failure_is_published() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let probe = ProbeFn::new(Target::tcp("127.0.0.1", 9), || async {
            ProbeResult::Failed(ProbeError::Refused)
        });
        let name: Arc<str> = Arc::from("127.0.0.1:9");

        let res = run_once(&probe, &name, 1, &CancellationToken::new(), &bus).await;
        assert_eq!(res, Some(ProbeResult::Failed(ProbeError::Refused)));

        assert_eq!(rx.recv().await.unwrap().kind, EventKind::ProbeStarting);
        let failed = rx.recv().await.unwrap();
        assert_eq!(failed.kind, EventKind::ProbeFailed);
        assert_eq!(failed.reason.as_deref(), Some("connection refused"));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_discards_in_flight_attempt() {
        let bus = Bus::new(16);
        let probe = ProbeFn::new(Target::file("/slow"), || async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            ProbeResult::Found
        });
        let name: Arc<str> = Arc::from("/slow");
        let token = CancellationToken::new();

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            canceller.cancel();
        });

        assert_eq!(run_once(&probe, &name, 1, &token, &bus).await, None);
    }
}
