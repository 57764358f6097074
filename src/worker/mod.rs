//! Background worker: drains the EoX sync queue and keeps its heartbeat
//! fresh so the crawler overview can report it as online.

use crate::cisco::{self, ApiEndpoints, CiscoApiClient, CredentialStore};
use crate::db::Db;
use crate::db::pgmq::{PgmqMessage, SYNC_QUEUE, SYNC_TASK};
use crate::error::Result;
use crate::model::Settings;
use crate::telemetry::lifecycle::{record_sync_outcome, start_sync_span};
use crate::telemetry::metrics;
use opentelemetry::KeyValue;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Notify;
use tokio::time::MissedTickBehavior;
use tracing::{Instrument, error, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// pgmq queue holding the sync tasks.
    pub queue: String,
    /// Visibility timeout (seconds) for pgmq reads.
    pub visibility_timeout: i32,
    /// How long to wait between polls of an empty queue.
    pub poll_interval: Duration,
    /// How often the heartbeat row is refreshed.
    pub heartbeat_interval: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            queue: SYNC_QUEUE.to_string(),
            visibility_timeout: 300,
            poll_interval: Duration::from_secs(5),
            heartbeat_interval: Duration::from_secs(20),
        }
    }
}

/// What happened to one queue message.
#[derive(Debug, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Sync ran; one status line per record.
    Synced(Vec<String>),
    /// Auto sync is switched off in the settings.
    Disabled,
}

pub struct SyncWorker {
    id: Uuid,
    hostname: String,
    db: Db,
    endpoints: ApiEndpoints,
    credentials: CredentialStore,
    config: WorkerConfig,
    shutdown: Arc<Notify>,
}

impl SyncWorker {
    pub fn new(
        db: Db,
        endpoints: ApiEndpoints,
        credentials: CredentialStore,
        config: WorkerConfig,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            hostname: hostname(),
            db,
            endpoints,
            credentials,
            config,
            shutdown: Arc::new(Notify::new()),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Handle that stops [`SyncWorker::run`] when notified.
    pub fn shutdown_handle(&self) -> Arc<Notify> {
        Arc::clone(&self.shutdown)
    }

    /// Run until shutdown is signalled.
    ///
    /// The heartbeat is refreshed from its own task so a long sync does not
    /// make the worker look offline.
    pub async fn run(&self) -> Result<()> {
        self.db.heartbeat_worker(self.id, &self.hostname).await?;
        info!(worker_id = %self.id, hostname = %self.hostname, "sync worker started");

        let db = self.db.clone();
        let (worker_id, hostname) = (self.id, self.hostname.clone());
        let heartbeat = tokio::spawn(keep_alive(self.config.heartbeat_interval, move || {
            let db = db.clone();
            let hostname = hostname.clone();
            async move { db.heartbeat_worker(worker_id, &hostname).await }
        }));

        self.poll_until_shutdown().await;
        heartbeat.abort();
        info!(worker_id = %self.id, "sync worker shutting down");
        Ok(())
    }

    async fn poll_until_shutdown(&self) {
        loop {
            let processed = match self.process_next().await {
                Ok(processed) => processed,
                Err(e) => {
                    error!("process_next error: {e}");
                    false
                }
            };
            if processed {
                continue;
            }

            tokio::select! {
                _ = self.shutdown.notified() => return,
                _ = tokio::time::sleep(self.config.poll_interval) => {}
            }
        }
    }

    /// Claim and execute at most one queued task. Returns whether a message
    /// was taken from the queue.
    ///
    /// Every task runs once: the message is archived whether the sync
    /// succeeds or fails, and a failure is only logged.
    pub async fn process_next(&self) -> Result<bool> {
        let queue = self.config.queue.as_str();
        let Some(msg) = self
            .db
            .read_from_queue(queue, self.config.visibility_timeout)
            .await?
        else {
            return Ok(false);
        };

        if !is_sync_task(&msg) {
            warn!(msg_id = msg.msg_id, "unknown task payload, dropping message");
            self.db.delete_message(queue, msg.msg_id).await?;
            return Ok(true);
        }

        let settings = self.db.get_or_create_settings().await?;
        let queries = settings.auto_sync_queries();
        let span = start_sync_span(msg.msg_id, queries.len());

        let started = Instant::now();
        let result = self
            .execute(&msg, &settings, &queries)
            .instrument(span.clone())
            .await;
        metrics::operation_duration_ms().record(
            started.elapsed().as_secs_f64() * 1000.0,
            &[KeyValue::new("operation", "eox_sync")],
        );

        match result {
            Ok(TaskOutcome::Synced(lines)) => record_sync_outcome(&span, lines.len()),
            Ok(TaskOutcome::Disabled) => {
                info!(msg_id = msg.msg_id, "automatic eox sync disabled, task skipped");
            }
            Err(e) => {
                span.in_scope(|| error!(msg_id = msg.msg_id, "eox sync failed, task dropped: {e}"));
            }
        }
        self.db.archive_message(queue, msg.msg_id).await?;
        Ok(true)
    }

    async fn execute(
        &self,
        msg: &PgmqMessage,
        settings: &Settings,
        queries: &[String],
    ) -> Result<TaskOutcome> {
        if !settings.cisco_api_enabled || !settings.cisco_eox_api_auto_sync_enabled {
            return Ok(TaskOutcome::Disabled);
        }

        info!(msg_id = msg.msg_id, queries = queries.len(), "eox sync started");
        let credentials = self.credentials.load()?;
        let client = CiscoApiClient::new(self.endpoints.clone(), credentials)?;
        let lines = cisco::update_cisco_eox_database(&self.db, &client, settings, queries).await?;
        Ok(TaskOutcome::Synced(lines))
    }
}

/// Call `beat` every `every` until the surrounding task is aborted.
async fn keep_alive<F, Fut>(every: Duration, mut beat: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; the caller has just beaten.
    ticker.tick().await;
    loop {
        ticker.tick().await;
        if let Err(e) = beat().await {
            warn!("heartbeat failed: {e}");
        }
    }
}

fn is_sync_task(msg: &PgmqMessage) -> bool {
    msg.message.get("task").and_then(|v| v.as_str()) == Some(SYNC_TASK)
}

fn hostname() -> String {
    std::env::var("HOSTNAME")
        .ok()
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}

/// Run a one-off sync outside the queue, e.g. from the test tools page.
pub async fn run_single_query(
    db: &Db,
    endpoints: &ApiEndpoints,
    credentials: &CredentialStore,
    query: &str,
) -> Result<Vec<String>> {
    let settings = db.get_or_create_settings().await?;
    let client = CiscoApiClient::new(endpoints.clone(), credentials.load()?)?;
    cisco::update_cisco_eox_database(db, &client, &settings, &[query.to_string()]).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn message(payload: serde_json::Value) -> PgmqMessage {
        PgmqMessage {
            msg_id: 1,
            read_ct: 1,
            enqueued_at: Utc::now(),
            vt: Utc::now(),
            message: payload,
        }
    }

    #[test]
    fn recognizes_sync_payloads() {
        assert!(is_sync_task(&message(serde_json::json!({
            "task": "synchronize_cisco_eox_states",
            "requested_by": "cli",
        }))));
        assert!(!is_sync_task(&message(serde_json::json!({"task": "other"}))));
        assert!(!is_sync_task(&message(serde_json::json!("junk"))));
    }

    #[tokio::test]
    async fn heartbeat_keeps_beating_during_long_work() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let beats = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&beats);
        let heartbeat = tokio::spawn(keep_alive(Duration::from_millis(10), move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }));

        // Stands in for a sync that outlives several heartbeat intervals.
        tokio::time::sleep(Duration::from_millis(200)).await;
        heartbeat.abort();

        assert!(beats.load(Ordering::SeqCst) >= 3);
    }
}
