//! # WaitCoordinator: runs every scheduler and resolves one outcome.
//!
//! The [`WaitCoordinator`] owns the event bus, the subscribers and the session
//! configuration. It spawns one [`RetryScheduler`] per target, enforces the global
//! deadline, and commits exactly one [`Outcome`].
//!
//! ## High-level architecture
//! ```text
//! Inputs to run():
//!   Vec<Target> ──► probes::for_target() ──► run_probes(Vec<ProbeRef>)
//!
//! Preparation:
//!   - WaitSession::new(targets, cfg.timeout)        (absolute deadline)
//!   - TargetTracker::with_bus(targets, bus)
//!   - event listener: Bus.subscribe() ─► SubscriberSet::emit(Event)
//!   - status ticker:  every cfg.status_every ─► tracker.render()
//!
//! Spawn schedulers:
//!   Target[0]  Target[1]  ...  Target[N-1]
//!       │          │               │
//!       └──► RetryScheduler::new(id, probe, params, tracker, bus)
//!                  └──► child token = root.child_token()
//!                       set.spawn(scheduler.run(child))
//!
//! Drive (biased select):
//!   ├─ deadline         ─► publish DeadlineReached ─► Timeout { unfinished }
//!   └─ join_next()
//!        ├─ Ready         ─► tracker Ready, pending -= 1
//!        │                   pending == 0 ─► publish AllReady ─► Success
//!        ├─ Fatal(err)    ─► tracker Failed ─► publish FatalFailure ─► Fatal
//!        └─ Cancelled     ─► ignored (the deadline branch decides)
//!
//! Teardown:
//!   root.cancel() ─► join every scheduler ─► stop ticker
//!                 ─► final snapshot ─► stop listener (drain + flush subscribers)
//! ```
//!
//! ## Rules
//! - Exactly one terminal transition per run; the outcome is committed once
//! - The deadline wins over a resolution that is ready in the same poll
//! - No scheduler is alive when [`WaitCoordinator::run`] returns
//! - A panicking scheduler resolves as `Fatal` with an `Os` reason
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use readygate::{Config, ProbeFn, ProbeRef, ProbeResult, Target, WaitCoordinator};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let mut cfg = Config::default();
//!     cfg.timeout = Duration::from_secs(2);
//!     cfg.status_every = Duration::ZERO;
//!
//!     let probe: ProbeRef = ProbeFn::arc(Target::file("/tmp/fake"), || async { ProbeResult::Found });
//!     let report = WaitCoordinator::new(cfg).run_probes(vec![probe]).await;
//!     assert!(report.outcome.is_success());
//! }
//! ```

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::{
    sync::broadcast::error::{RecvError, TryRecvError},
    task::{JoinHandle, JoinSet},
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{
    config::Config,
    core::{
        scheduler::{Resolution, RetryScheduler, SchedulerParams},
        session::{Outcome, WaitSession, deadline_after},
        tracker::{TargetStatus, TargetTracker, render_rows},
    },
    error::{ProbeError, join_targets},
    events::{Bus, Event, EventKind},
    probes::{self, ProbeRef},
    subscribers::{Subscribe, SubscriberSet},
    targets::{Target, TargetId},
};

/// Result of one coordinator run.
#[derive(Debug, Clone)]
pub struct WaitReport {
    /// The committed outcome.
    pub outcome: Outcome,
    /// Final status of every target, in registration order.
    pub statuses: Vec<(Target, TargetStatus)>,
    /// Time from session start to teardown.
    pub elapsed: Duration,
}

impl WaitReport {
    /// Renders the final status table.
    pub fn render(&self) -> String {
        render_rows(&self.statuses)
    }
}

/// Runs all schedulers of a session concurrently and resolves one [`Outcome`].
pub struct WaitCoordinator {
    cfg: Config,
    bus: Bus,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl WaitCoordinator {
    /// Creates a coordinator without subscribers.
    pub fn new(cfg: Config) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        Self {
            cfg,
            bus,
            subscribers: Vec::new(),
        }
    }

    /// Replaces the subscriber list.
    #[must_use]
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Returns the event bus (for receivers outside the subscriber set).
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Waits for the given targets using the built-in probes.
    pub async fn run(&self, targets: &[Target]) -> WaitReport {
        let probes = targets
            .iter()
            .map(|t| probes::for_target(t, &self.cfg))
            .collect();
        self.run_probes(probes).await
    }

    /// Waits for the given probes. Target ids follow vector order.
    pub async fn run_probes(&self, probes: Vec<ProbeRef>) -> WaitReport {
        let targets: Vec<Target> = probes.iter().map(|p| p.target().clone()).collect();
        let session = WaitSession::new(targets, self.cfg.timeout);
        let tracker = Arc::new(TargetTracker::with_bus(session.targets(), self.bus.clone()));

        let listener_stop = CancellationToken::new();
        let listener = self.spawn_listener(listener_stop.clone());

        let root = CancellationToken::new();
        let ticker = self.spawn_status_ticker(Arc::clone(&tracker), root.child_token());

        let mut set = JoinSet::new();
        self.spawn_schedulers(&mut set, &root, &session, &tracker, probes);

        let outcome = self.drive(&session, &tracker, &mut set).await;

        root.cancel();
        while set.join_next().await.is_some() {}
        if let Some(ticker) = ticker {
            let _ = ticker.await;
        }

        let statuses = tracker.snapshot().await;
        let elapsed = session.elapsed();

        listener_stop.cancel();
        let _ = listener.await;

        WaitReport {
            outcome,
            statuses,
            elapsed,
        }
    }

    /// Spawns one scheduler per probe with a child token of `root`.
    fn spawn_schedulers(
        &self,
        set: &mut JoinSet<(TargetId, Resolution)>,
        root: &CancellationToken,
        session: &WaitSession,
        tracker: &Arc<TargetTracker>,
        probes: Vec<ProbeRef>,
    ) {
        let params = SchedulerParams {
            interval: self.cfg.retry_interval(),
            fail_fast: self.cfg.fail_fast.clone(),
            deadline: session.deadline(),
        };

        for (idx, probe) in probes.into_iter().enumerate() {
            let id = TargetId(idx);
            let scheduler = RetryScheduler::new(
                id,
                probe,
                params.clone(),
                Arc::clone(tracker),
                self.bus.clone(),
            );
            let child = root.child_token();
            set.spawn(async move {
                match AssertUnwindSafe(scheduler.run(child)).catch_unwind().await {
                    Ok(resolved) => resolved,
                    Err(_) => (
                        id,
                        Resolution::Fatal {
                            attempts: 0,
                            error: ProbeError::Os("probe task panicked".into()),
                        },
                    ),
                }
            });
        }
    }

    /// Waits for the first terminal transition and commits it.
    async fn drive(
        &self,
        session: &WaitSession,
        tracker: &TargetTracker,
        set: &mut JoinSet<(TargetId, Resolution)>,
    ) -> Outcome {
        let targets = session.targets();
        if targets.is_empty() {
            self.bus.publish(Event::new(EventKind::AllReady));
            return commit(session, Outcome::Success);
        }

        let mut ready = vec![false; targets.len()];
        let mut pending = targets.len();
        let deadline = time::sleep_until(session.deadline());
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                biased;
                _ = &mut deadline => {
                    let unfinished: Vec<Target> = targets
                        .iter()
                        .zip(&ready)
                        .filter(|(_, done)| !**done)
                        .map(|(t, _)| t.clone())
                        .collect();
                    self.bus.publish(
                        Event::new(EventKind::DeadlineReached)
                            .with_timeout(self.cfg.timeout)
                            .with_reason(join_targets(&unfinished)),
                    );
                    return commit(session, Outcome::Timeout { unfinished });
                }
                Some(joined) = set.join_next() => {
                    let (id, resolution) = match joined {
                        Ok(resolved) => resolved,
                        Err(e) => {
                            warn!(target: "readygate::session", err = %e, "scheduler task ended abnormally");
                            continue;
                        }
                    };
                    match resolution {
                        Resolution::Ready { .. } => {
                            tracker.update(id, TargetStatus::Ready).await;
                            if let Some(done) = ready.get_mut(id.0).filter(|d| !**d) {
                                *done = true;
                                pending -= 1;
                            }
                            if pending == 0 {
                                self.bus.publish(Event::new(EventKind::AllReady));
                                return commit(session, Outcome::Success);
                            }
                        }
                        Resolution::Fatal { error, .. } => {
                            let Some(target) = targets.get(id.0).cloned() else {
                                continue;
                            };
                            tracker.update(id, TargetStatus::Failed(error.clone())).await;
                            self.bus.publish(
                                Event::new(EventKind::FatalFailure)
                                    .with_target(target.to_string())
                                    .with_reason(error.to_string()),
                            );
                            return commit(session, Outcome::Fatal { target, reason: error });
                        }
                        Resolution::Cancelled => {}
                    }
                }
            }
        }
    }

    /// Subscribes to the bus and forwards events to a fresh [`SubscriberSet`].
    ///
    /// On `stop` the listener drains what is already buffered, then waits until
    /// every subscriber processed its queue.
    fn spawn_listener(&self, stop: CancellationToken) -> JoinHandle<()> {
        let mut rx = self.bus.subscribe();
        let set = SubscriberSet::new(self.subscribers.clone(), self.bus.clone());

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    msg = rx.recv() => match msg {
                        Ok(ev) => set.emit(ev),
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(target: "readygate::session", skipped, "event listener lagged");
                        }
                        Err(RecvError::Closed) => break,
                    },
                    _ = stop.cancelled() => break,
                }
            }
            loop {
                match rx.try_recv() {
                    Ok(ev) => set.emit(ev),
                    Err(TryRecvError::Lagged(_)) => continue,
                    Err(_) => break,
                }
            }
            set.shutdown().await;
        })
    }

    /// Logs the full status table every `cfg.status_every` until `token` is cancelled.
    fn spawn_status_ticker(
        &self,
        tracker: Arc<TargetTracker>,
        token: CancellationToken,
    ) -> Option<JoinHandle<()>> {
        let every = self.cfg.status_interval()?;
        let first = deadline_after(Instant::now(), every);

        Some(tokio::spawn(async move {
            let mut ticker = time::interval_at(first, every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        info!(target: "readygate::status", "status:\n{}", tracker.render().await);
                    }
                }
            }
        }))
    }
}

/// Commits `outcome` and returns what the session holds afterwards.
fn commit(session: &WaitSession, outcome: Outcome) -> Outcome {
    if !session.commit(outcome.clone()) {
        warn!(target: "readygate::session", "outcome already committed, keeping the first");
    }
    session.outcome().cloned().unwrap_or(outcome)
}
