//! # Probe abstraction.
//!
//! A [`Probe`] performs one readiness check against one [`Target`] and never retries.
//! Retrying is the job of [`RetryScheduler`](crate::core).
//!
//! # Example
//! ```
//! use async_trait::async_trait;
//! use readygate::{Probe, ProbeResult, Target};
//!
//! struct AlwaysUp(Target);
//!
//! #[async_trait]
//! impl Probe for AlwaysUp {
//!     fn target(&self) -> &Target { &self.0 }
//!     async fn probe(&self) -> ProbeResult { ProbeResult::Connected }
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ProbeError;
use crate::targets::Target;

/// Result of one probe attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    /// TCP connection established.
    Connected,
    /// File exists.
    Found,
    /// Not ready; the error says why.
    Failed(ProbeError),
}

impl ProbeResult {
    /// Returns true if the target is ready.
    pub fn is_ready(&self) -> bool {
        matches!(self, ProbeResult::Connected | ProbeResult::Found)
    }

    /// Returns the failure, if any.
    pub fn error(&self) -> Option<&ProbeError> {
        match self {
            ProbeResult::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// # Single-shot readiness check.
#[async_trait]
pub trait Probe: Send + Sync + 'static {
    /// The target this probe checks.
    fn target(&self) -> &Target;

    /// Performs exactly one attempt.
    async fn probe(&self) -> ProbeResult;
}

/// Shared handle to a probe.
pub type ProbeRef = Arc<dyn Probe>;
