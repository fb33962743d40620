//! # Wait session configuration.
//!
//! Provides [`Config`], the centralized settings for one wait session.
//! The CLI fills it from flags and environment variables; embedders construct
//! it directly and tweak fields.
//!
//! ## Sentinel values
//! - `status_every = 0s` → no periodic status table
//! - `connect_timeout = 0s` → connect attempts are not bounded (OS default applies)
//! - `interval = 0s` → treated as 1ms so a failing target never spins

use std::time::Duration;

use crate::policies::FailFast;

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Settings for one wait session.
///
/// ## Field semantics
/// - `timeout`: global deadline for all targets combined
/// - `connect_timeout`: per-attempt bound for a TCP connect
/// - `status_every`: cadence of the periodic status table (`0s` = off)
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by Bus)
/// - `interval`: fixed delay between attempts of one target
/// - `fail_fast`: probe error kinds that end the session immediately
#[derive(Clone, Debug)]
pub struct Config {
    /// Overall time budget. The session ends with a timeout when it elapses.
    pub timeout: Duration,

    /// Upper bound for a single TCP connect attempt.
    ///
    /// Independent of `timeout`, so retry cadence stays predictable.
    pub connect_timeout: Duration,

    /// How often the full status table is printed while waiting.
    pub status_every: Duration,

    /// Capacity of the event bus broadcast channel.
    ///
    /// Subscribers that lag more than `bus_capacity` events skip older items.
    pub bus_capacity: usize,

    /// Pause between two attempts on the same target.
    pub interval: Duration,

    /// Probe error kinds treated as fatal.
    pub fail_fast: FailFast,
}

impl Config {
    /// Returns the periodic status interval as an `Option`.
    #[inline]
    pub fn status_interval(&self) -> Option<Duration> {
        if self.status_every == Duration::ZERO {
            None
        } else {
            Some(self.status_every)
        }
    }

    /// Returns the per-attempt connect timeout as an `Option`.
    #[inline]
    pub fn attempt_timeout(&self) -> Option<Duration> {
        if self.connect_timeout == Duration::ZERO {
            None
        } else {
            Some(self.connect_timeout)
        }
    }

    /// Returns the retry interval, never shorter than 1ms.
    #[inline]
    pub fn retry_interval(&self) -> Duration {
        self.interval.max(MIN_INTERVAL)
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `timeout = 10s`
    /// - `connect_timeout = 1s`
    /// - `status_every = 5s`
    /// - `bus_capacity = 1024`
    /// - `interval = 1s`
    /// - `fail_fast = FailFast::default()` (OS errors only)
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(1),
            status_every: Duration::from_secs(5),
            bus_capacity: 1024,
            interval: Duration::from_secs(1),
            fail_fast: FailFast::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sentinels_disable_features() {
        let cfg = Config {
            status_every: Duration::ZERO,
            connect_timeout: Duration::ZERO,
            bus_capacity: 0,
            interval: Duration::ZERO,
            ..Config::default()
        };
        assert_eq!(cfg.status_interval(), None);
        assert_eq!(cfg.attempt_timeout(), None);
        assert_eq!(cfg.bus_capacity_clamped(), 1);
        assert_eq!(cfg.retry_interval(), Duration::from_millis(1));
    }

    #[test]
    fn defaults_match_documented_values() {
        let cfg = Config::default();
        assert_eq!(cfg.timeout, Duration::from_secs(10));
        assert_eq!(cfg.status_interval(), Some(Duration::from_secs(5)));
        assert_eq!(cfg.attempt_timeout(), Some(Duration::from_secs(1)));
        assert_eq!(cfg.retry_interval(), Duration::from_secs(1));
    }
}
