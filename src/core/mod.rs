//! Wait engine: orchestration and lifecycle.
//!
//! The public entry point is [`WaitCoordinator`], which runs every target's
//! scheduler, enforces the global deadline and resolves one [`Outcome`].
//!
//! Internal modules:
//! - [`runner`]: executes one probe attempt under cancellation and publishes its events;
//! - [`scheduler`]: retries a single target at a fixed interval under a fail-fast policy;
//! - [`tracker`]: per-target status table and its rendering;
//! - [`session`]: targets, absolute deadline and the write-once outcome;
//! - [`coordinator`]: spawns schedulers, applies the deadline, tears down.

mod coordinator;
mod runner;
mod scheduler;
mod session;
mod tracker;

pub use coordinator::{WaitCoordinator, WaitReport};
pub use runner::run_once;
pub use scheduler::{Resolution, RetryScheduler, SchedulerParams};
pub use session::{Outcome, WaitSession};
pub use tracker::{TargetStatus, TargetTracker, render_rows};
