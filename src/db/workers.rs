//! Worker heartbeats.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::model::WorkerState;

impl super::Db {
    /// Register a worker or refresh its heartbeat.
    pub async fn heartbeat_worker(&self, worker_id: Uuid, hostname: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO worker_state (worker_id, hostname, started_at, last_heartbeat)
             VALUES ($1, $2, now(), now())
             ON CONFLICT (worker_id) DO UPDATE SET last_heartbeat = now()",
        )
        .bind(worker_id)
        .bind(hostname)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    pub async fn list_workers(&self) -> Result<Vec<WorkerState>> {
        let rows: Vec<(Uuid, String, DateTime<Utc>, DateTime<Utc>)> = sqlx::query_as(
            "SELECT worker_id, hostname, started_at, last_heartbeat
             FROM worker_state ORDER BY last_heartbeat DESC",
        )
        .fetch_all(self.pool())
        .await?;
        Ok(rows
            .into_iter()
            .map(
                |(worker_id, hostname, started_at, last_heartbeat)| WorkerState {
                    worker_id,
                    hostname,
                    started_at,
                    last_heartbeat,
                },
            )
            .collect())
    }
}
