//! productdb CLI: web server, sync worker and operator commands.

use clap::{Parser, Subcommand};
use productdb_rs::cisco::{ApiEndpoints, CredentialStore};
use productdb_rs::config::Config;
use productdb_rs::db::Db;
use productdb_rs::db::pgmq::SYNC_QUEUE;
use productdb_rs::lifecycle::{self, BulkCheckReport, normalize_queries};
use productdb_rs::telemetry::{TelemetryConfig, TelemetryGuard, init_telemetry};
use productdb_rs::web::{self, AppState};
use productdb_rs::worker::{SyncWorker, WorkerConfig};
use secrecy::ExposeSecret;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "productdb", about = "Product lifecycle database")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Listen address, overrides BIND_ADDR
        #[arg(long)]
        bind: Option<String>,
    },
    /// Run the EoX sync worker
    Worker {
        /// Seconds a claimed task stays invisible to other workers
        #[arg(long, default_value_t = 300)]
        visibility_timeout: i32,
    },
    /// Bulk EoL check of product ids from a file or stdin
    Check {
        /// One product id per line; reads stdin when omitted
        file: Option<PathBuf>,
    },
    /// Queue an EoX sync task
    Sync,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Command::Serve { bind } => cmd_serve(config, bind).await,
        Command::Worker { visibility_timeout } => cmd_worker(config, visibility_timeout).await,
        Command::Check { file } => cmd_check(config, file).await,
        Command::Sync => cmd_sync(config).await,
    }
}

fn telemetry(config: &Config, service_name: &str) -> anyhow::Result<TelemetryGuard> {
    Ok(init_telemetry(TelemetryConfig {
        endpoint: config.otel_endpoint.clone(),
        service_name: service_name.to_string(),
        log_level: config.log_level.clone(),
    })?)
}

async fn connect(config: &Config) -> anyhow::Result<Db> {
    let db = Db::connect(config.database_url.expose_secret()).await?;
    db.migrate().await?;
    db.create_queue(SYNC_QUEUE).await?;
    Ok(db)
}

async fn cmd_serve(config: Config, bind: Option<String>) -> anyhow::Result<()> {
    let _guard = telemetry(&config, "productdb")?;
    let db = connect(&config).await?;

    let bind_addr = bind.unwrap_or_else(|| config.bind_addr.clone());
    web::serve(AppState::new(db, &config), &bind_addr).await?;
    Ok(())
}

async fn cmd_worker(config: Config, visibility_timeout: i32) -> anyhow::Result<()> {
    let guard = telemetry(&config, "productdb-worker")?;
    let db = connect(&config).await?;

    let worker = SyncWorker::new(
        db,
        ApiEndpoints::from(&config),
        CredentialStore::new(config.credentials_file.clone()),
        WorkerConfig {
            visibility_timeout,
            ..WorkerConfig::default()
        },
    );

    let shutdown = worker.shutdown_handle();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        shutdown.notify_one();
    });

    worker.run().await?;
    guard.force_flush();
    Ok(())
}

async fn cmd_check(config: Config, file: Option<PathBuf>) -> anyhow::Result<()> {
    let _guard = telemetry(&config, "productdb-cli")?;

    let raw = match file {
        Some(path) => std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("cannot read {}: {e}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let db = Db::connect(config.database_url.expose_secret()).await?;
    let queries = normalize_queries(&raw);
    let catalog = db.catalog_snapshot(&queries).await?;
    let report = lifecycle::bulk_check(&catalog, &queries);
    print_report(&report);
    Ok(())
}

fn print_report(report: &BulkCheckReport) {
    if report.query_no_result {
        println!("No matching products found.");
    } else {
        println!(
            "{:<30}  {:<8}  {:<10}  {:<12}  {:<12}  END OF SUPPORT",
            "PRODUCT ID", "COUNT", "STATE", "ANNOUNCED", "END OF SALE"
        );
        println!("{}", "-".repeat(100));
        for stat in report.result_stats.values() {
            let p = &stat.product;
            println!(
                "{:<30}  {:<8}  {:<10}  {:<12}  {:<12}  {}",
                p.product_id,
                stat.count,
                stat.state,
                p.eol_ext_announcement_date.as_deref().unwrap_or("-"),
                p.end_of_sale_date.as_deref().unwrap_or("-"),
                p.end_of_support_date.as_deref().unwrap_or("-"),
            );
        }
        println!("\n{} product(s), {} EoL", report.query_result.len(), report.eol_count());
    }

    if !report.skipped_queries.is_empty() {
        println!("\nSkipped:");
        for skipped in report.skipped_queries.values() {
            println!("  {:<30}  {} (x{})", skipped.query, skipped.reason, skipped.count);
        }
    }
}

async fn cmd_sync(config: Config) -> anyhow::Result<()> {
    let db = connect(&config).await?;
    let task_id = db.enqueue_sync_task("cli").await?;
    db.record_sync_task(task_id).await?;
    println!("Queued EoX sync task {task_id}");
    Ok(())
}
