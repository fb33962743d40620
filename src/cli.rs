//! Command-line interface of the `readygate` binary.
//!
//! Flags are parsed by `clap`; [`Args::into_plan`] applies the cross-field
//! checks and turns the flags into the pieces `main` wires together.
//! `-h` is `--host`, so help is only available as `--help`.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};

use crate::completion::CommandHandoff;
use crate::config::Config;
use crate::error::WaitError;
use crate::logger::{LoggerConfig, LoggerFormat};
use crate::policies::FailFast;
use crate::targets::Target;

/// Block until TCP endpoints accept connections and files exist, then run a command.
#[derive(Parser, Debug)]
#[command(
    name = "readygate",
    version,
    disable_help_flag = true,
    override_usage = "readygate -h host:port [-h host:port ...] [-f path ...] [-t 10] [options] [-- command args...]"
)]
pub struct Args {
    /// TCP endpoint that must accept a connection (repeatable).
    #[arg(short = 'h', long = "host", value_name = "HOST:PORT", value_parser = Target::parse_tcp)]
    pub hosts: Vec<Target>,

    /// Path that must exist (repeatable).
    #[arg(short = 'f', long = "file", value_name = "PATH", value_parser = Target::parse_file)]
    pub files: Vec<Target>,

    /// Global timeout in seconds.
    #[arg(
        short = 't',
        long,
        value_name = "SECONDS",
        env = "READYGATE_TIMEOUT",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// Delay between attempts of one target, in milliseconds.
    #[arg(
        short = 'i',
        long,
        value_name = "MILLIS",
        env = "READYGATE_INTERVAL",
        default_value_t = 1000,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval: u64,

    /// Upper bound for one TCP connect, in milliseconds (0 = OS default).
    #[arg(long, value_name = "MILLIS", default_value_t = 1000)]
    pub connect_timeout: u64,

    /// Probe error kinds that abort the wait: refused,timeout,not_found,error or none.
    #[arg(long, value_name = "KINDS", default_value = "error")]
    pub fail_fast: FailFast,

    /// Print the full status table every N seconds (0 disables).
    #[arg(long, value_name = "SECONDS", default_value_t = 5)]
    pub status_every: u64,

    /// Hosts file consulted before DNS.
    #[arg(long, value_name = "PATH", env = "READYGATE_HOSTS_FILE")]
    pub hosts_file: Option<PathBuf>,

    /// Log filter directive.
    #[arg(long, value_name = "FILTER", env = "READYGATE_LOG", default_value = "info")]
    pub log_level: String,

    /// Log output format: text or json.
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub log_format: LoggerFormat,

    /// Print help.
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,

    /// Command executed once every target is ready.
    #[arg(last = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

/// Everything `main` needs to run one invocation.
#[derive(Debug)]
pub struct Plan {
    pub config: Config,
    /// Targets in registration order (`-h` first, then `-f`).
    pub targets: Vec<Target>,
    pub hosts_file: Option<PathBuf>,
    pub logger: LoggerConfig,
    /// Handoff command; `None` announces readiness instead.
    pub command: Option<CommandHandoff>,
}

impl Args {
    /// Validates cross-field constraints and builds the [`Plan`].
    pub fn into_plan(self) -> Result<Plan, WaitError> {
        let mut targets = self.hosts;
        targets.extend(self.files);
        if targets.is_empty() {
            return Err(WaitError::Misconfiguration(
                "At least one host or file must be specified.".into(),
            ));
        }
        let config = Config {
            timeout: Duration::from_secs(self.timeout),
            connect_timeout: Duration::from_millis(self.connect_timeout),
            status_every: Duration::from_secs(self.status_every),
            interval: Duration::from_millis(self.interval),
            fail_fast: self.fail_fast,
            ..Config::default()
        };

        let logger = LoggerConfig {
            format: self.log_format,
            level: self.log_level,
            ..LoggerConfig::default()
        };

        let mut command = self.command.into_iter();
        let command = command
            .next()
            .map(|program| CommandHandoff::new(program, command.collect()));

        Ok(Plan {
            config,
            targets,
            hosts_file: self.hosts_file,
            logger,
            command,
        })
    }
}
