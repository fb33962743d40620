//! # Function-backed probe (`ProbeFn`)
//!
//! [`ProbeFn`] wraps a closure `F: Fn() -> Fut`, producing a fresh future per attempt.
//! Useful for embedding custom readiness checks and for driving the coordinator in tests.
//!
//! ## Example
//! ```rust
//! use readygate::{ProbeFn, ProbeRef, ProbeResult, Target};
//!
//! let p: ProbeRef = ProbeFn::arc(Target::file("/tmp/fake"), || async { ProbeResult::Found });
//! assert_eq!(p.target().to_string(), "/tmp/fake");
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::probes::{Probe, ProbeResult};
use crate::targets::Target;

/// Closure-backed probe implementation.
pub struct ProbeFn<F> {
    target: Target,
    f: F,
}

impl<F> ProbeFn<F> {
    pub fn new(target: Target, f: F) -> Self {
        Self { target, f }
    }

    /// Creates the probe and returns it as a shared handle.
    pub fn arc(target: Target, f: F) -> Arc<Self> {
        Arc::new(Self::new(target, f))
    }
}

#[async_trait]
impl<F, Fut> Probe for ProbeFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ProbeResult> + Send + 'static,
{
    fn target(&self) -> &Target {
        &self.target
    }

    async fn probe(&self) -> ProbeResult {
        (self.f)().await
    }
}
