//! # Success handoff.
//!
//! A [`Handoff`] runs once after every target became ready and yields the process
//! exit code.
//!
//! ## Built-ins
//! ```text
//! AnnounceReady   ─► log "All targets are up."           ─► Ok(0)
//! CommandHandoff  ─► log "Running: <program> [<args>]"
//!                    ├─ unix:  exec() replaces the process  (returns only on error)
//!                    └─ other: spawn + wait                 ─► Ok(child exit code)
//! HandoffFn       ─► user closure
//! ```

use std::io;
use std::process::Command;

use thiserror::Error;
use tracing::info;

use crate::error::EXIT_OK;

/// Failure to perform the success handoff.
#[derive(Error, Debug)]
pub enum HandoffError {
    /// The command could not be executed.
    #[error("cannot execute {program}: {source}")]
    Exec {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The spawned command ended without an exit code.
    #[error("{program} was terminated by a signal")]
    Signaled { program: String },

    /// Failure reported by a custom handoff.
    #[error("{0}")]
    Custom(String),
}

impl HandoffError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            HandoffError::Exec { .. } => "handoff_exec",
            HandoffError::Signaled { .. } => "handoff_signaled",
            HandoffError::Custom(_) => "handoff_custom",
        }
    }
}

/// Action performed once on success. Returns the process exit code.
pub trait Handoff: Send {
    fn hand_off(self: Box<Self>) -> Result<i32, HandoffError>;
}

/// Logs the all-clear and exits with 0.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnnounceReady;

impl Handoff for AnnounceReady {
    fn hand_off(self: Box<Self>) -> Result<i32, HandoffError> {
        info!(target: "readygate::completion", "All targets are up.");
        Ok(EXIT_OK)
    }
}

/// Replaces the current process with a command (or runs it, where `exec` is unavailable).
///
/// The environment is inherited unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandHandoff {
    program: String,
    args: Vec<String>,
}

impl CommandHandoff {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Handoff for CommandHandoff {
    fn hand_off(self: Box<Self>) -> Result<i32, HandoffError> {
        info!(
            target: "readygate::completion",
            "Running: {} [{}]",
            self.program,
            self.args.join(" ")
        );
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        launch(cmd, self.program)
    }
}

#[cfg(unix)]
fn launch(mut cmd: Command, program: String) -> Result<i32, HandoffError> {
    use std::os::unix::process::CommandExt;

    let source = cmd.exec();
    Err(HandoffError::Exec { program, source })
}

#[cfg(not(unix))]
fn launch(mut cmd: Command, program: String) -> Result<i32, HandoffError> {
    let status = match cmd.status() {
        Ok(status) => status,
        Err(source) => return Err(HandoffError::Exec { program, source }),
    };
    status.code().ok_or(HandoffError::Signaled { program })
}

/// Closure-backed handoff.
///
/// ## Example
/// ```rust
/// use readygate::{Handoff, HandoffFn};
///
/// let h: Box<dyn Handoff> = Box::new(HandoffFn::new(|| Ok(0)));
/// assert_eq!(h.hand_off().unwrap(), 0);
/// ```
pub struct HandoffFn<F> {
    f: F,
}

impl<F> HandoffFn<F>
where
    F: FnOnce() -> Result<i32, HandoffError> + Send,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Handoff for HandoffFn<F>
where
    F: FnOnce() -> Result<i32, HandoffError> + Send,
{
    fn hand_off(self: Box<Self>) -> Result<i32, HandoffError> {
        (self.f)()
    }
}
