//! # Completion: what happens once the outcome is known.
//!
//! - [`CompletionHandler`] - consumes the [`Outcome`](crate::Outcome) exactly once
//! - [`Handoff`] - success action: [`AnnounceReady`], [`CommandHandoff`] or [`HandoffFn`]
//! - [`HandoffError`] - the handoff could not be performed

mod handler;
mod handoff;

pub use handler::CompletionHandler;
pub use handoff::{AnnounceReady, CommandHandoff, Handoff, HandoffError, HandoffFn};
