//! # Host resolution before the wait starts.
//!
//! Every TCP target whose host is not an IP literal is resolved once, up front:
//!
//! ```text
//! host ──► IP literal?            ──► keep
//!      ──► hosts-file override?   ──► first matching entry
//!      ──► tokio::net::lookup_host ──► first IPv4 address, else the first address
//!      ──► nothing                 ──► ResolveError (misconfiguration)
//! ```
//!
//! Targets keep the host the user wrote; the address travels next to it in a
//! [`ResolvedTarget`] so status tables and errors name `db:5432`, not `10.0.0.5:5432`.
//!
//! Hosts-file syntax follows `/etc/hosts`: `<ip> <name> [<alias>...]`, `#` starts a
//! comment, names compare case-insensitively and the first match wins.

use std::io;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::net::lookup_host;
use tracing::info;

use crate::config::Config;
use crate::error::WaitError;
use crate::probes::{ProbeRef, for_resolved};
use crate::targets::Target;

/// Host resolution failure.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("cannot read hosts file {}: {source}", path.display())]
    HostsFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot resolve {host}: {reason}")]
    Lookup { host: String, reason: String },
    #[error("no address found for {host}")]
    NoAddress { host: String },
}

impl From<ResolveError> for WaitError {
    fn from(e: ResolveError) -> Self {
        WaitError::Misconfiguration(e.to_string())
    }
}

/// Parsed hosts-file override.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostsFile {
    entries: Vec<(String, IpAddr)>,
}

impl HostsFile {
    /// Parses `/etc/hosts` syntax. Lines without a valid address are skipped.
    pub fn parse(text: &str) -> Self {
        let mut entries = Vec::new();
        for line in text.lines() {
            let line = line.split('#').next().unwrap_or_default();
            let mut fields = line.split_whitespace();
            let Some(Ok(ip)) = fields.next().map(str::parse::<IpAddr>) else {
                continue;
            };
            entries.extend(fields.map(|name| (name.to_ascii_lowercase(), ip)));
        }
        Self { entries }
    }

    /// Reads and parses a hosts file.
    pub async fn load(path: &Path) -> Result<Self, ResolveError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ResolveError::HostsFile {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::parse(&text))
    }

    /// Returns the address of the first entry naming `host`.
    pub fn lookup(&self, host: &str) -> Option<IpAddr> {
        self.entries
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(host))
            .map(|(_, ip)| *ip)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A target as written plus the address its host resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub target: Target,
    /// `None` for files and for hosts that already are IP literals.
    pub addr: Option<IpAddr>,
}

impl ResolvedTarget {
    /// Builds the built-in probe, dialling the resolved address.
    pub fn probe(&self, cfg: &Config) -> ProbeRef {
        for_resolved(&self.target, self.addr, cfg)
    }
}

/// Resolves target hosts to IP addresses.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    hosts: Option<HostsFile>,
}

impl Resolver {
    pub fn new(hosts: Option<HostsFile>) -> Self {
        Self { hosts }
    }

    /// Resolves one host name.
    pub async fn resolve_host(&self, host: &str, port: u16) -> Result<IpAddr, ResolveError> {
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(ip);
        }
        if let Some(ip) = self.hosts.as_ref().and_then(|h| h.lookup(host)) {
            return Ok(ip);
        }

        let addrs: Vec<SocketAddr> = lookup_host((host, port))
            .await
            .map_err(|e| ResolveError::Lookup {
                host: host.to_string(),
                reason: e.to_string(),
            })?
            .collect();
        addrs
            .iter()
            .find(|a| a.is_ipv4())
            .or_else(|| addrs.first())
            .map(SocketAddr::ip)
            .ok_or_else(|| ResolveError::NoAddress {
                host: host.to_string(),
            })
    }

    /// Resolves the host of every TCP target named by a host name.
    pub async fn resolve_targets(
        &self,
        targets: Vec<Target>,
    ) -> Result<Vec<ResolvedTarget>, ResolveError> {
        let mut resolved = Vec::with_capacity(targets.len());
        for target in targets {
            let addr = match (target.unresolved_host(), &target) {
                (Some(host), Target::Tcp { port, .. }) => {
                    let ip = self.resolve_host(host, *port).await?;
                    info!(target: "readygate::resolve", "Resolving {host}.. --> {ip}");
                    Some(ip)
                }
                _ => None,
            };
            resolved.push(ResolvedTarget { target, addr });
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::net::Ipv4Addr;

    const HOSTS: &str = "\
# static entries
127.0.0.1   localhost
10.0.0.5    db db.internal   # primary
10.0.0.6    DB
not-an-ip   ignored
::1         ip6-localhost
";

    #[test]
    fn parses_names_and_aliases() {
        let hosts = HostsFile::parse(HOSTS);
        assert_eq!(hosts.lookup("db.internal"), Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5))));
        assert_eq!(hosts.lookup("ip6-localhost"), Some("::1".parse().unwrap()));
        assert_eq!(hosts.lookup("ignored"), None);
        assert_eq!(hosts.lookup("primary"), None);
    }

    #[test]
    fn first_match_wins_case_insensitively() {
        let hosts = HostsFile::parse(HOSTS);
        assert_eq!(hosts.lookup("DB"), Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5))));
    }

    #[tokio::test]
    async fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(HOSTS.as_bytes()).unwrap();

        let hosts = HostsFile::load(file.path()).await.unwrap();
        assert_eq!(hosts.len(), 5);
    }

    #[tokio::test]
    async fn missing_hosts_file_is_an_error() {
        let err = HostsFile::load(Path::new("/nonexistent/hosts")).await.unwrap_err();
        assert!(matches!(err, ResolveError::HostsFile { .. }));
    }

    #[tokio::test]
    async fn override_applies_before_dns() {
        let resolver = Resolver::new(Some(HostsFile::parse(HOSTS)));
        let targets = vec![
            Target::tcp("db", 5432),
            Target::tcp("192.168.1.1", 80),
            Target::file("/tmp/flag"),
        ];

        let resolved = resolver.resolve_targets(targets.clone()).await.unwrap();
        let addrs: Vec<_> = resolved.iter().map(|r| r.addr).collect();
        assert_eq!(addrs, vec![Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5))), None, None]);

        let kept: Vec<_> = resolved.into_iter().map(|r| r.target).collect();
        assert_eq!(kept, targets);
    }

    #[tokio::test]
    async fn probes_report_the_name_not_the_address() {
        let resolver = Resolver::new(Some(HostsFile::parse(HOSTS)));
        let resolved = resolver
            .resolve_targets(vec![Target::tcp("db.internal", 5432)])
            .await
            .unwrap();

        let probe = resolved[0].probe(&Config::default());
        assert_eq!(probe.target().to_string(), "db.internal:5432");
    }

    #[tokio::test]
    async fn unresolvable_host_is_a_misconfiguration() {
        let resolver = Resolver::default();
        let err = resolver
            .resolve_targets(vec![Target::tcp("readygate-test.invalid", 80)])
            .await
            .unwrap_err();

        let err = WaitError::from(err);
        assert_eq!(err.exit_code(), crate::error::EXIT_MISCONFIGURATION);
    }
}
