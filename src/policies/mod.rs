//! Retry policies.
//!
//! Decides **whether** a failed probe is retried. The pause between attempts is a
//! fixed [`Config::interval`](crate::Config::interval).
//!
//! ## Quick wiring
//! ```text
//! Config { interval: Duration, fail_fast: FailFast, .. }
//!      └─► core::scheduler::RetryScheduler uses:
//!           - fail_fast to decide retry/fatal
//!           - interval to schedule the next attempt
//! ```
//!
//! ## Defaults
//! - `FailFast::default()` → only OS-level errors are fatal.

mod fail_fast;

pub use fail_fast::FailFast;
