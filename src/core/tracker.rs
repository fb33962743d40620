//! # Per-target status tracker.
//!
//! Single source of truth for human-visible status. It is **not** the source of
//! truth for completion; that is the session's write-once [`Outcome`](crate::Outcome).
//!
//! ## Architecture
//! ```text
//! RetryScheduler ──┐                         ┌──► Bus(StatusChanged) ──► LogWriter
//!                  ├──► TargetTracker::update ┤
//! WaitCoordinator ─┘         │                └──► Vec<Entry> (registration order)
//!                            ▼
//!                     snapshot() / render() ◄── status ticker, final report
//! ```
//!
//! ## Rules
//! - Writes go through [`TargetTracker::update`] only (async `RwLock`)
//! - `Ready` and `Failed` are terminal: later updates for that target are ignored
//! - Writing the current status again is a no-op (no event, no change)
//! - Snapshots are taken under the read lock: never a half-applied update

use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::ProbeError;
use crate::events::{Bus, Event, EventKind};
use crate::targets::{Target, TargetId};

/// Human-visible status of one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetStatus {
    /// No attempt has finished yet.
    Waiting,
    /// At least one attempt failed; another one is scheduled.
    Retrying {
        attempt: u32,
        last_error: Option<ProbeError>,
    },
    /// The target is available.
    Ready,
    /// The target failed with a fatal error.
    Failed(ProbeError),
}

impl TargetStatus {
    /// Returns true for `Ready` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TargetStatus::Ready | TargetStatus::Failed(_))
    }
}

impl fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetStatus::Waiting => f.write_str("Waiting"),
            TargetStatus::Retrying {
                attempt,
                last_error: Some(err),
            } => write!(f, "Retrying (attempt {attempt}): {err}"),
            TargetStatus::Retrying {
                attempt,
                last_error: None,
            } => write!(f, "Retrying (attempt {attempt})"),
            TargetStatus::Ready => f.write_str("OK"),
            TargetStatus::Failed(err) => write!(f, "Failed: {err}"),
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    target: Target,
    name: Arc<str>,
    status: TargetStatus,
}

/// Thread-safe status table for all targets of a session.
pub struct TargetTracker {
    entries: RwLock<Vec<Entry>>,
    bus: Option<Bus>,
}

impl TargetTracker {
    /// Creates a tracker with every target `Waiting`. Ids follow slice order.
    pub fn new(targets: &[Target]) -> Self {
        let entries = targets
            .iter()
            .map(|t| Entry {
                target: t.clone(),
                name: Arc::from(t.to_string()),
                status: TargetStatus::Waiting,
            })
            .collect();
        Self {
            entries: RwLock::new(entries),
            bus: None,
        }
    }

    /// Same as [`TargetTracker::new`], publishing `StatusChanged` events to `bus`.
    pub fn with_bus(targets: &[Target], bus: Bus) -> Self {
        Self {
            bus: Some(bus),
            ..Self::new(targets)
        }
    }

    /// Overwrites the status of `id`.
    ///
    /// Returns `true` if the stored status changed. Unknown ids, repeated
    /// statuses and updates to terminal targets return `false`.
    pub async fn update(&self, id: TargetId, status: TargetStatus) -> bool {
        let mut entries = self.entries.write().await;
        let Some(entry) = entries.get_mut(id.0) else {
            return false;
        };
        if entry.status == status || entry.status.is_terminal() {
            return false;
        }

        if let Some(bus) = &self.bus {
            bus.publish(
                Event::new(EventKind::StatusChanged)
                    .with_target(Arc::clone(&entry.name))
                    .with_reason(status.to_string()),
            );
        }
        entry.status = status;
        true
    }

    /// Returns every `(target, status)` pair in registration order.
    pub async fn snapshot(&self) -> Vec<(Target, TargetStatus)> {
        self.entries
            .read()
            .await
            .iter()
            .map(|e| (e.target.clone(), e.status.clone()))
            .collect()
    }

    /// Returns the status of one target.
    pub async fn status(&self, id: TargetId) -> Option<TargetStatus> {
        self.entries
            .read()
            .await
            .get(id.0)
            .map(|e| e.status.clone())
    }

    /// Renders the table as `<target> | <status>` lines.
    pub async fn render(&self) -> String {
        render_rows(&self.snapshot().await)
    }
}

/// Formats snapshot rows, one `<target> | <status>` line each, targets left-aligned.
pub fn render_rows(rows: &[(Target, TargetStatus)]) -> String {
    let names: Vec<String> = rows.iter().map(|(t, _)| t.to_string()).collect();
    let width = names.iter().map(String::len).max().unwrap_or(0);
    names
        .iter()
        .zip(rows)
        .map(|(name, (_, status))| format!("{name:<width$} | {status}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets() -> Vec<Target> {
        vec![Target::tcp("127.0.0.1", 9), Target::file("/tmp/ready.flag")]
    }

    #[tokio::test]
    async fn starts_waiting_in_registration_order() {
        let tracker = TargetTracker::new(&targets());
        let snap = tracker.snapshot().await;
        assert_eq!(
            snap,
            vec![
                (Target::tcp("127.0.0.1", 9), TargetStatus::Waiting),
                (Target::file("/tmp/ready.flag"), TargetStatus::Waiting),
            ]
        );
    }

    #[tokio::test]
    async fn repeated_update_is_idempotent() {
        let tracker = TargetTracker::new(&targets());
        let status = TargetStatus::Retrying {
            attempt: 1,
            last_error: Some(ProbeError::Refused),
        };

        assert!(tracker.update(TargetId(0), status.clone()).await);
        let first = tracker.snapshot().await;
        assert!(!tracker.update(TargetId(0), status).await);
        assert_eq!(tracker.snapshot().await, first);
    }

    #[tokio::test]
    async fn terminal_status_is_sticky() {
        let tracker = TargetTracker::new(&targets());
        assert!(tracker.update(TargetId(1), TargetStatus::Ready).await);
        assert!(!tracker.update(TargetId(1), TargetStatus::Waiting).await);
        assert!(
            !tracker
                .update(TargetId(1), TargetStatus::Failed(ProbeError::NotFound))
                .await
        );
        assert_eq!(tracker.status(TargetId(1)).await, Some(TargetStatus::Ready));
    }

    #[tokio::test]
    async fn unknown_id_is_ignored() {
        let tracker = TargetTracker::new(&targets());
        assert!(!tracker.update(TargetId(7), TargetStatus::Ready).await);
    }

    #[tokio::test]
    async fn changes_are_published_once() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let tracker = TargetTracker::with_bus(&targets(), bus);

        tracker.update(TargetId(0), TargetStatus::Ready).await;
        tracker.update(TargetId(0), TargetStatus::Ready).await;

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::StatusChanged);
        assert_eq!(ev.target.as_deref(), Some("127.0.0.1:9"));
        assert_eq!(ev.reason.as_deref(), Some("OK"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn concurrent_updates_do_not_tear() {
        let tracker = Arc::new(TargetTracker::new(&targets()));
        let mut handles = Vec::new();
        for attempt in 1..=50u32 {
            let tracker = Arc::clone(&tracker);
            handles.push(tokio::spawn(async move {
                tracker
                    .update(
                        TargetId(0),
                        TargetStatus::Retrying {
                            attempt,
                            last_error: Some(ProbeError::Refused),
                        },
                    )
                    .await
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        match tracker.status(TargetId(0)).await {
            Some(TargetStatus::Retrying {
                attempt,
                last_error: Some(ProbeError::Refused),
            }) => assert!((1..=50).contains(&attempt)),
            other => panic!("unexpected status {other:?}"),
        }
    }

    #[test]
    fn renders_aligned_rows() {
        let rows = vec![
            (Target::tcp("db", 5432), TargetStatus::Ready),
            (
                Target::file("/tmp/ready.flag"),
                TargetStatus::Failed(ProbeError::Os("permission denied".into())),
            ),
        ];
        assert_eq!(
            render_rows(&rows),
            "db:5432         | OK\n/tmp/ready.flag | Failed: permission denied"
        );
    }
}
