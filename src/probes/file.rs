//! # File existence probe.
//!
//! Any failure to stat the path (missing, permission denied, broken symlink) counts
//! as "not found yet". A filesystem race never surfaces as an error.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::ProbeError;
use crate::probes::{Probe, ProbeResult};
use crate::targets::Target;

/// Probe that succeeds once a path exists.
#[derive(Debug, Clone)]
pub struct FileProbe {
    target: Target,
    path: PathBuf,
}

impl FileProbe {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            target: Target::file(path.clone()),
            path,
        }
    }

    /// Returns true if `path` exists right now. Blocks on the stat call.
    pub fn check(path: &Path) -> bool {
        std::fs::metadata(path).is_ok()
    }

    /// Non-blocking form of [`FileProbe::check`], stat runs on tokio's blocking pool.
    pub async fn exists(path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }
}

#[async_trait]
impl Probe for FileProbe {
    fn target(&self) -> &Target {
        &self.target
    }

    async fn probe(&self) -> ProbeResult {
        if Self::exists(&self.path).await {
            ProbeResult::Found
        } else {
            ProbeResult::Failed(ProbeError::NotFound)
        }
    }
}
