//! Plotvault process entry point: configuration, adapter wiring and the
//! ingest/read CLI. No orchestration logic lives here.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use bytes::Bytes;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use pv_app::retry::{Backoff, RetryPolicy};
use pv_app::usecases::{GetExtractDetail, ListExtracts, SaveExtractUseCase};
use pv_core::extract::{CadastralNumber, RawExtractUpload};
use pv_core::ports::{
    ExtractBlobStorePort, ExtractRepositoryPort, ParcelReaderPort, ParcelWriterPort,
};
use pv_infra::blob::FsBlobStore;
use pv_infra::config::{AppConfig, BackoffKind};
use pv_infra::db::executor::SqliteExecutor;
use pv_infra::db::pool::init_db_pool;
use pv_infra::db::repositories::{DieselExtractRepository, DieselParcelRepository};
use pv_infra::telemetry::TracingTelemetry;
use pv_infra::SystemClock;

#[derive(Parser)]
#[command(name = "plotvault", about = "Cadastral plan extract archive")]
struct Cli {
    /// Path to the configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Archive one extract document.
    Ingest {
        /// Cadastral block number, e.g. 47:14:1203001.
        #[arg(long)]
        number: String,
        /// Two-digit region code; defaults to the number's region prefix.
        #[arg(long)]
        region: Option<String>,
        /// Issue date of the extract, YYYY-MM-DD.
        #[arg(long)]
        issued: String,
        /// Abort the save after this many seconds.
        #[arg(long)]
        deadline_secs: Option<u64>,
        /// Path to the extract document (JSON).
        document: PathBuf,
    },
    /// Show one archived extract with its derived parcels.
    Show {
        /// Cadastral block number.
        number: String,
    },
    /// List recently archived extracts, newest first.
    List {
        #[arg(long, default_value_t = 20)]
        limit: usize,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = AppConfig::load(cli.config.as_deref())?;

    let pool = init_db_pool(&cfg.database_url)?;
    let executor = SqliteExecutor::new(pool);
    let extract_repo = Arc::new(DieselExtractRepository::new(executor.clone()));
    let parcel_repo = Arc::new(DieselParcelRepository::new(executor));

    match cli.command {
        Command::Ingest {
            number,
            region,
            issued,
            deadline_secs,
            document,
        } => {
            let blob_store = Arc::new(FsBlobStore::new(&cfg.blob_root)?);
            let save = SaveExtractUseCase::from_ports(
                extract_repo as Arc<dyn ExtractRepositoryPort>,
                blob_store as Arc<dyn ExtractBlobStorePort>,
                parcel_repo as Arc<dyn ParcelWriterPort>,
                Arc::new(SystemClock),
                Arc::new(TracingTelemetry),
                retry_policy(&cfg),
            );

            let content = tokio::fs::read(&document)
                .await
                .with_context(|| format!("failed to read {}", document.display()))?;
            let upload = RawExtractUpload {
                region_code: region.unwrap_or_else(|| number.chars().take(2).collect()),
                cadastral_number: number,
                issued_at_ms: parse_issue_date(&issued)?,
                content: Bytes::from(content),
                content_type: "application/json".to_string(),
            };

            let scope = CancellationToken::new();
            tokio::spawn(cancel_on_ctrl_c(scope.clone()));
            if let Some(secs) = deadline_secs {
                tokio::spawn(cancel_after(scope.clone(), Duration::from_secs(secs)));
            }

            match save.execute(&scope, upload).await {
                Ok(extract_id) => info!(extract_id = %extract_id, "Extract archived"),
                Err(err) => {
                    error!(error = %err, "Save failed");
                    std::process::exit(1);
                }
            }
        }
        Command::Show { number } => {
            let number = CadastralNumber::parse(&number)?;
            let detail = GetExtractDetail::from_ports(
                extract_repo as Arc<dyn ExtractRepositoryPort>,
                parcel_repo as Arc<dyn ParcelReaderPort>,
            )
            .execute(&number)
            .await?;

            match detail {
                Some(detail) => println!("{}", serde_json::to_string_pretty(&detail)?),
                None => println!("extract {number} is not archived"),
            }
        }
        Command::List { limit, offset } => {
            let extracts = ListExtracts::from_ports(extract_repo as Arc<dyn ExtractRepositoryPort>)
                .execute(limit, offset)
                .await?;
            for extract in extracts {
                println!(
                    "{}  region {}  {} bytes  archived at {}",
                    extract.cadastral_number,
                    extract.region_code,
                    extract.size_bytes,
                    extract.archived_at_ms
                );
            }
        }
    }

    Ok(())
}

fn retry_policy(cfg: &AppConfig) -> RetryPolicy {
    let base = Duration::from_millis(cfg.retry.backoff_base_ms);
    let backoff = match cfg.retry.backoff {
        BackoffKind::Constant => Backoff::Constant(base),
        BackoffKind::Linear => Backoff::Linear(base),
        BackoffKind::Exponential => Backoff::Exponential { base },
    };
    RetryPolicy::new(cfg.retry.max_attempts, backoff)
}

fn parse_issue_date(issued: &str) -> Result<i64> {
    let date = chrono::NaiveDate::parse_from_str(issued, "%Y-%m-%d")
        .with_context(|| format!("invalid issue date {issued:?}, expected YYYY-MM-DD"))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .context("invalid issue date midnight")?;
    Ok(midnight.and_utc().timestamp_millis())
}

async fn cancel_on_ctrl_c(scope: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Ctrl-C received; cancelling in-flight work");
        scope.cancel();
    }
}

async fn cancel_after(scope: CancellationToken, deadline: Duration) {
    tokio::time::sleep(deadline).await;
    scope.cancel();
}
