//! # TCP connect probe.
//!
//! One non-blocking connect per attempt, driven by the tokio reactor and bounded
//! by the per-attempt connect timeout.
//!
//! ## Classification
//! ```text
//! connect ok                → Connected (socket closed right away)
//! ECONNREFUSED              → Failed(Refused)
//! connect timeout elapsed   → Failed(TimedOut)
//! any other error           → Failed(Os(message))
//! ```

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::{net::TcpStream, time};

use crate::error::ProbeError;
use crate::probes::{Probe, ProbeResult};
use crate::targets::Target;

/// Probe that succeeds once `host:port` accepts a TCP connection.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    target: Target,
    /// Address actually dialled; differs from the target host once resolved.
    host: String,
    port: u16,
    connect_timeout: Option<Duration>,
}

impl TcpProbe {
    /// Creates a probe for `host:port`.
    pub fn new(host: impl Into<String>, port: u16, connect_timeout: Option<Duration>) -> Self {
        let host = host.into();
        Self {
            target: Target::tcp(host.clone(), port),
            host,
            port,
            connect_timeout,
        }
    }

    /// Dials `ip` instead of the target host, keeping the target as written for reports.
    #[must_use]
    pub fn connecting_to(mut self, ip: IpAddr) -> Self {
        self.host = ip.to_string();
        self
    }

    /// Attempts a single connection to `host:port`.
    ///
    /// The stream is never used for payload traffic; it is dropped (and the socket
    /// closed) as soon as the result is classified.
    pub async fn attempt(host: &str, port: u16, connect_timeout: Option<Duration>) -> ProbeResult {
        let connect = TcpStream::connect((host, port));
        let res = match connect_timeout.filter(|d| *d > Duration::ZERO) {
            Some(dur) => match time::timeout(dur, connect).await {
                Ok(r) => r,
                Err(_elapsed) => return ProbeResult::Failed(ProbeError::TimedOut),
            },
            None => connect.await,
        };

        match res {
            Ok(stream) => {
                drop(stream);
                ProbeResult::Connected
            }
            Err(e) => ProbeResult::Failed(ProbeError::from_connect(&e)),
        }
    }
}

#[async_trait]
impl Probe for TcpProbe {
    fn target(&self) -> &Target {
        &self.target
    }

    async fn probe(&self) -> ProbeResult {
        Self::attempt(&self.host, self.port, self.connect_timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn listening_port_connects() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let probe = TcpProbe::new("127.0.0.1", port, Some(Duration::from_secs(1)));
        assert_eq!(probe.probe().await, ProbeResult::Connected);
    }

    #[tokio::test]
    async fn resolved_probe_keeps_the_name_it_was_given() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let probe = TcpProbe::new("db.invalid", port, Some(Duration::from_secs(1)))
            .connecting_to(IpAddr::from([127, 0, 0, 1]));
        assert_eq!(probe.target(), &Target::tcp("db.invalid", port));
        assert_eq!(probe.target().to_string(), format!("db.invalid:{port}"));
        assert_eq!(probe.probe().await, ProbeResult::Connected);
    }

    #[tokio::test]
    async fn closed_port_is_refused() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };

        let res = TcpProbe::attempt("127.0.0.1", port, Some(Duration::from_secs(1))).await;
        assert_eq!(res, ProbeResult::Failed(ProbeError::Refused));
    }

    #[tokio::test]
    async fn unresolvable_host_is_an_os_error() {
        let res = TcpProbe::attempt("no-such-host.invalid", 80, Some(Duration::from_secs(5))).await;
        assert!(matches!(
            res,
            ProbeResult::Failed(ProbeError::Os(_)) | ProbeResult::Failed(ProbeError::TimedOut)
        ));
    }
}
