//! # Event subscribers.
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   RetryScheduler ── publish(Event) ──► Bus ──► coordinator listener ──► SubscriberSet
//!                                                                    ┌─────────┼─────────┐
//!                                                                    ▼         ▼         ▼
//!                                                                LogWriter   Custom     ...
//! ```
//!
//! The built-in [`LogWriter`] is exported with the `logging` feature (on by default).

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
