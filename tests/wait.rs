//! End-to-end waits against real sockets and files.

use std::net::TcpListener;
use std::time::Duration;

use readygate::{
    CompletionHandler, Config, EXIT_TIMEOUT, HostsFile, Outcome, ProbeRef, Resolver, Target,
    TargetStatus, WaitCoordinator, WaitError,
};

fn config(timeout: Duration, interval: Duration) -> Config {
    Config {
        timeout,
        connect_timeout: Duration::from_millis(500),
        status_every: Duration::ZERO,
        interval,
        ..Config::default()
    }
}

/// Returns a localhost port with nothing listening on it.
fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

#[tokio::test]
async fn listening_port_is_ready_before_deadline() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let report = WaitCoordinator::new(config(Duration::from_secs(5), Duration::from_secs(1)))
        .run(&[Target::tcp("127.0.0.1", port)])
        .await;

    assert_eq!(report.outcome, Outcome::Success);
    assert!(report.elapsed < Duration::from_secs(5));
    assert_eq!(report.statuses[0].1, TargetStatus::Ready);
}

#[tokio::test]
async fn closed_port_and_missing_file_time_out() {
    let dir = tempfile::tempdir().unwrap();
    let tcp = Target::tcp("127.0.0.1", closed_port());
    let file = Target::file(dir.path().join("never.flag"));

    let report = WaitCoordinator::new(config(Duration::from_secs(1), Duration::from_millis(200)))
        .run(&[tcp.clone(), file.clone()])
        .await;

    assert_eq!(
        report.outcome,
        Outcome::Timeout {
            unfinished: vec![tcp, file]
        }
    );
    assert!(report.render().contains("Retrying"));

    let err = CompletionHandler::default()
        .complete(report.outcome)
        .unwrap_err();
    assert_eq!(err.exit_code(), EXIT_TIMEOUT);
}

#[tokio::test]
async fn timeout_names_hosts_as_written() {
    let port = closed_port();
    let hosts = HostsFile::parse("127.0.0.1 db\n");
    let cfg = config(Duration::from_secs(1), Duration::from_millis(200));

    let resolved = Resolver::new(Some(hosts))
        .resolve_targets(vec![Target::tcp("db", port)])
        .await
        .unwrap();
    let probes: Vec<ProbeRef> = resolved.iter().map(|r| r.probe(&cfg)).collect();
    let report = WaitCoordinator::new(cfg).run_probes(probes).await;

    let db = Target::tcp("db", port);
    assert_eq!(report.outcome, Outcome::Timeout { unfinished: vec![db.clone()] });
    assert!(report.render().contains(&format!("db:{port}")));
    assert!(!report.render().contains(&format!("127.0.0.1:{port}")));

    let err = report.outcome.into_result().unwrap_err();
    assert!(matches!(err, WaitError::Timeout { ref unfinished } if *unfinished == [db.clone()]));
    assert!(err.to_string().contains(&format!("db:{port}")));
}

#[tokio::test]
async fn file_created_later_is_picked_up() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ready.flag");

    let writer = {
        let path = path.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            tokio::fs::write(&path, b"ok").await.unwrap();
        })
    };

    let report = WaitCoordinator::new(config(Duration::from_secs(5), Duration::from_millis(100)))
        .run(&[Target::file(&path)])
        .await;
    writer.await.unwrap();

    assert_eq!(report.outcome, Outcome::Success);
    assert!(report.elapsed < Duration::from_secs(2));
}

#[cfg(unix)]
mod binary {
    use super::*;
    use std::process::Command;

    fn readygate() -> Command {
        Command::new(env!("CARGO_BIN_EXE_readygate"))
    }

    #[test]
    fn missing_targets_exit_with_misconfiguration() {
        let out = readygate().args(["-t", "1"]).output().unwrap();
        assert_eq!(out.status.code(), Some(2));
        assert!(String::from_utf8_lossy(&out.stderr).contains("At least one host or file"));
    }

    #[test]
    fn bad_port_exits_with_misconfiguration() {
        let out = readygate().args(["-h", "localhost:70000"]).output().unwrap();
        assert_eq!(out.status.code(), Some(2));
    }

    #[test]
    fn unready_target_exits_with_timeout() {
        let port = closed_port().to_string();
        let out = readygate()
            .args(["-h", &format!("127.0.0.1:{port}"), "-t", "1", "-i", "200"])
            .output()
            .unwrap();
        assert_eq!(out.status.code(), Some(4));
    }

    #[test]
    fn ready_target_hands_off_to_command() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let out = readygate()
            .args(["-h", &addr.to_string(), "-t", "5", "--", "sh", "-c", "exit 7"])
            .output()
            .unwrap();
        assert_eq!(out.status.code(), Some(7));
        assert!(String::from_utf8_lossy(&out.stdout).contains("Running: sh [-c exit 7]"));
    }

    #[test]
    fn ready_target_without_command_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        let flag = dir.path().join("up");
        std::fs::write(&flag, b"").unwrap();

        let out = readygate()
            .arg("-f")
            .arg(&flag)
            .output()
            .unwrap();
        assert_eq!(out.status.code(), Some(0));
        assert!(String::from_utf8_lossy(&out.stdout).contains("All targets are up."));
    }
}
