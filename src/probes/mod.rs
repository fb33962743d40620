//! # Probes: single-shot readiness checks.
//!
//! - [`Probe`] - trait for one non-retried check against one target
//! - [`ProbeResult`] - connected / found / failed with a [`ProbeError`](crate::ProbeError)
//! - [`TcpProbe`] - TCP connect with a per-attempt timeout
//! - [`FileProbe`] - path existence
//! - [`ProbeFn`] - closure-backed probe

mod file;
mod probe;
mod probe_fn;
mod tcp;

use std::net::IpAddr;
use std::sync::Arc;

pub use file::FileProbe;
pub use probe::{Probe, ProbeRef, ProbeResult};
pub use probe_fn::ProbeFn;
pub use tcp::TcpProbe;

use crate::config::Config;
use crate::targets::Target;

/// Builds the built-in probe for a target.
pub fn for_target(target: &Target, cfg: &Config) -> ProbeRef {
    match target {
        Target::Tcp { host, port } => {
            Arc::new(TcpProbe::new(host.clone(), *port, cfg.attempt_timeout()))
        }
        Target::File { path } => Arc::new(FileProbe::new(path.clone())),
    }
}

/// Builds the built-in probe for a target whose host resolved to `addr`.
///
/// The probe dials `addr` while events and reports keep naming `target`.
pub fn for_resolved(target: &Target, addr: Option<IpAddr>, cfg: &Config) -> ProbeRef {
    match (target, addr) {
        (Target::Tcp { host, port }, Some(ip)) => Arc::new(
            TcpProbe::new(host.clone(), *port, cfg.attempt_timeout()).connecting_to(ip),
        ),
        _ => for_target(target, cfg),
    }
}
