//! Sync worker registration and status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// A registered sync worker and its last heartbeat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerState {
    pub worker_id: Uuid,
    pub hostname: String,
    pub started_at: DateTime<Utc>,
    pub last_heartbeat: DateTime<Utc>,
}

impl WorkerState {
    pub fn is_alive(&self, now: DateTime<Utc>, liveness: Duration) -> bool {
        match chrono::Duration::from_std(liveness) {
            Ok(window) => now - self.last_heartbeat <= window,
            Err(_) => true,
        }
    }
}

/// Whether anything is around to run queued sync tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStatus {
    /// No worker ever registered.
    NoWorker,
    /// At least one worker heartbeat within the liveness window.
    Online,
    /// Workers registered, none recently alive.
    OfflineOnly,
}

impl WorkerStatus {
    pub fn classify(workers: &[WorkerState], now: DateTime<Utc>, liveness: Duration) -> Self {
        if workers.is_empty() {
            WorkerStatus::NoWorker
        } else if workers.iter().any(|w| w.is_alive(now, liveness)) {
            WorkerStatus::Online
        } else {
            WorkerStatus::OfflineOnly
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            WorkerStatus::NoWorker => "No worker found, periodic and scheduled tasks will not run",
            WorkerStatus::Online => "Online Worker found, task backend running.",
            WorkerStatus::OfflineOnly => {
                "Only offline Worker found, task backend not running. \
                 Please verify the state of the worker processes."
            }
        }
    }
}

impl std::fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            WorkerStatus::NoWorker => "no_worker",
            WorkerStatus::Online => "online",
            WorkerStatus::OfflineOnly => "offline_only",
        };
        write!(f, "{s}")
    }
}
