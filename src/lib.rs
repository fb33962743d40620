//! # readygate
//!
//! **readygate** is a readiness gate: it blocks until a set of TCP endpoints accept
//! connections and a set of paths exist, or until a global timeout elapses, and then
//! optionally hands the process over to a command. It is used to sequence the startup
//! of dependent services.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │    Target    │   │    Target    │   │    Target    │
//!     │  (db:5432)   │   │ (redis:6379) │   │ (/tmp/ready) │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  WaitCoordinator                                                  │
//! │  - WaitSession (absolute deadline, write-once Outcome)            │
//! │  - TargetTracker (per-target status, rendered table)              │
//! │  - Bus + SubscriberSet (event fan-out)                            │
//! │  - CancellationToken tree (root ─► one child per scheduler)       │
//! └──────┬──────────────────┬──────────────────┬───────────────┬──────┘
//!        ▼                  ▼                  ▼               │
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   │
//!     │RetryScheduler│   │RetryScheduler│   │RetryScheduler│   │
//!     │  TcpProbe    │   │  TcpProbe    │   │  FileProbe   │   │
//!     └┬─────────────┘   └┬─────────────┘   └┬─────────────┘   │
//!      │ ProbeStarting    │ ProbeFailed      │ StatusChanged   │ AllReady
//!      │ RetryScheduled   │ ...              │ ...             │ DeadlineReached
//!      ▼                  ▼                  ▼                 ▼ FatalFailure
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                       ┌────────────────────────┐
//!                       │     event listener     │
//!                       └───────────┬────────────┘
//!                                   ▼
//!                             SubscriberSet ──► LogWriter, custom subscribers
//! ```
//!
//! ### Lifecycle
//! ```text
//! targets ──► Resolver (hosts file, DNS) ──► WaitCoordinator::run()
//!                                                │
//!                     ┌──────────────────────────┼──────────────────────────┐
//!                     ▼                          ▼                          ▼
//!              all schedulers Ready        a scheduler Fatal          deadline elapsed
//!                     │                          │                          │
//!                 Success                 Fatal { target }        Timeout { unfinished }
//!                     └──────────────────────────┼──────────────────────────┘
//!                                                ▼
//!                                 cancel root token, join schedulers
//!                                                ▼
//!                                   CompletionHandler::complete()
//!                                   ├─ Success ─► Handoff (announce / exec command)
//!                                   └─ failure ─► WaitError (exit 3 or 4)
//! ```
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                         |
//! |-------------------|----------------------------------------------------------|--------------------------------------------|
//! | **Probes**        | Single-shot TCP connect and path-existence checks.       | [`Probe`], [`TcpProbe`], [`FileProbe`]     |
//! | **Policies**      | Fixed retry interval, fail-fast classification.          | [`Config`], [`FailFast`]                   |
//! | **Engine**        | Concurrent scheduling, deadline, single outcome.         | [`WaitCoordinator`], [`Outcome`]           |
//! | **Subscriber API**| Hook into probe and session events.                      | [`Subscribe`], [`Event`]                   |
//! | **Completion**    | Success handoff, exit code taxonomy.                     | [`CompletionHandler`], [`Handoff`]         |
//! | **Errors**        | Typed errors with exit codes.                            | [`ProbeError`], [`WaitError`]              |
//!
//! ## Optional features
//! - `logging` (default): exports the built-in [`LogWriter`] subscriber.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use readygate::{CompletionHandler, Config, ProbeFn, ProbeRef, ProbeResult, Target, WaitCoordinator};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), readygate::WaitError> {
//!     let cfg = Config {
//!         timeout: Duration::from_secs(5),
//!         status_every: Duration::ZERO,
//!         ..Config::default()
//!     };
//!
//!     let db: ProbeRef = ProbeFn::arc(Target::tcp("127.0.0.1", 5432), || async {
//!         ProbeResult::Connected
//!     });
//!
//!     let report = WaitCoordinator::new(cfg).run_probes(vec![db]).await;
//!     let code = CompletionHandler::default().complete(report.outcome)?;
//!     assert_eq!(code, 0);
//!     Ok(())
//! }
//! ```
pub mod cli;
mod completion;
mod config;
mod core;
mod error;
mod events;
pub mod logger;
mod policies;
mod probes;
pub mod resolve;
mod subscribers;
mod targets;

// ---- Public re-exports ----

pub use completion::{
    AnnounceReady, CommandHandoff, CompletionHandler, Handoff, HandoffError, HandoffFn,
};
pub use config::Config;
pub use core::{
    Outcome, Resolution, RetryScheduler, SchedulerParams, TargetStatus, TargetTracker,
    WaitCoordinator, WaitReport, WaitSession, render_rows, run_once,
};
pub use error::{
    EXIT_MISCONFIGURATION, EXIT_OK, EXIT_RUNTIME, EXIT_TIMEOUT, ProbeError, ProbeErrorKind,
    WaitError,
};
pub use events::{Bus, Event, EventKind};
pub use policies::FailFast;
pub use probes::{
    FileProbe, Probe, ProbeFn, ProbeRef, ProbeResult, TcpProbe, for_resolved, for_target,
};
pub use resolve::{HostsFile, ResolveError, ResolvedTarget, Resolver};
pub use subscribers::{Subscribe, SubscriberSet};
pub use targets::{Target, TargetId, TargetParseError};

// Optional: built-in logging subscriber.
// Enable with: `--features logging` (on by default)
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
