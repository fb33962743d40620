//! # Wait targets.
//!
//! A [`Target`] is one thing a session waits on: a TCP endpoint or a filesystem path.
//! [`TargetId`] is its index in registration order, assigned by the tracker.

mod target;

pub use target::{Target, TargetId, TargetParseError};
