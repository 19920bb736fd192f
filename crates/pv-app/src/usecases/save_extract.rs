use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use pv_core::extract::{CadastralExtract, RawExtractUpload};
use pv_core::ids::ExtractId;
use pv_core::ports::{
    ClockPort, ExtractBlobStorePort, ExtractRepositoryPort, ParcelWriterPort, TelemetryPort,
};
use pv_core::SaveExtractError;

use crate::retry::RetryPolicy;
use crate::task_group::{run_all, TaskGroupError, TaskSpec};

/// Archive one cadastral extract across three independent stores.
/// 将一份地籍提取件归档到三个相互独立的存储。
///
/// One request flows through: canonicalize the upload, reject duplicates via
/// the metadata store, then persist metadata, document blob and derived
/// parcels concurrently, each retried on its own and all sharing one
/// cancellable scope. Successful writes are not rolled back when a sibling
/// fails permanently.
pub struct SaveExtractUseCase {
    extract_repo: Arc<dyn ExtractRepositoryPort>,
    blob_store: Arc<dyn ExtractBlobStorePort>,
    parcel_writer: Arc<dyn ParcelWriterPort>,
    clock: Arc<dyn ClockPort>,
    telemetry: Arc<dyn TelemetryPort>,
    retry: RetryPolicy,
}

impl SaveExtractUseCase {
    pub fn from_ports(
        extract_repo: Arc<dyn ExtractRepositoryPort>,
        blob_store: Arc<dyn ExtractBlobStorePort>,
        parcel_writer: Arc<dyn ParcelWriterPort>,
        clock: Arc<dyn ClockPort>,
        telemetry: Arc<dyn TelemetryPort>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            extract_repo,
            blob_store,
            parcel_writer,
            clock,
            telemetry,
            retry,
        }
    }

    /// Execute the save flow for one upload.
    ///
    /// Returns the id of the archived extract, or exactly one classified
    /// error. A duplicate block number short-circuits before any write.
    #[tracing::instrument(
        name = "usecase.save_extract.execute",
        skip(self, scope, upload),
        fields(cadastral_number = %upload.cadastral_number)
    )]
    pub async fn execute(
        &self,
        scope: &CancellationToken,
        upload: RawExtractUpload,
    ) -> Result<ExtractId, SaveExtractError> {
        info!("Starting extract save");

        let extract = CadastralExtract::from_upload(&upload, self.clock.now_ms())?;
        let number = extract.cadastral_number.clone();

        match self.extract_repo.exists(&number).await {
            Ok(false) => {}
            Ok(true) => return Err(SaveExtractError::AlreadyExists(number)),
            Err(err) => {
                self.telemetry
                    .log_error("save_extract.exists", "Existence check failed", &err);
                return Err(SaveExtractError::Store(err));
            }
        }

        let extract_id = extract.id.clone();
        let upload = Arc::new(upload);
        let extract = Arc::new(extract);

        let save_metadata = {
            let repo = Arc::clone(&self.extract_repo);
            let extract = Arc::clone(&extract);
            let telemetry = Arc::clone(&self.telemetry);
            TaskSpec::new("save-metadata", move || {
                let repo = Arc::clone(&repo);
                let extract = Arc::clone(&extract);
                let telemetry = Arc::clone(&telemetry);
                async move {
                    let result = repo.insert_metadata(&extract).await;
                    if let Err(err) = &result {
                        telemetry.log_error(
                            "save_extract.metadata",
                            "Failed to save extract metadata",
                            err,
                        );
                    }
                    result
                }
            })
        };

        let upload_blob = {
            let blob_store = Arc::clone(&self.blob_store);
            let upload = Arc::clone(&upload);
            let telemetry = Arc::clone(&self.telemetry);
            TaskSpec::new("upload-blob", move || {
                let blob_store = Arc::clone(&blob_store);
                let upload = Arc::clone(&upload);
                let telemetry = Arc::clone(&telemetry);
                async move {
                    let result = blob_store.upload(&upload).await;
                    if let Err(err) = &result {
                        telemetry.log_error(
                            "save_extract.blob",
                            "Failed to upload extract document",
                            err,
                        );
                    }
                    result
                }
            })
        };

        let save_parcels = {
            let parcel_writer = Arc::clone(&self.parcel_writer);
            let upload = Arc::clone(&upload);
            let telemetry = Arc::clone(&self.telemetry);
            TaskSpec::new("save-parcels", move || {
                let parcel_writer = Arc::clone(&parcel_writer);
                let upload = Arc::clone(&upload);
                let telemetry = Arc::clone(&telemetry);
                async move {
                    let result = parcel_writer.save_from_extract(&upload).await;
                    if let Err(err) = &result {
                        telemetry.log_error(
                            "save_extract.parcels",
                            "Failed to save derived parcels",
                            err,
                        );
                    }
                    result
                }
            })
        };

        let tasks = vec![save_metadata, upload_blob, save_parcels];
        if let Err(err) = run_all(scope, self.retry, tasks).await {
            self.telemetry
                .log_error("save_extract.group", "Failed to save extract", &err);
            return Err(match err {
                TaskGroupError::TaskFailed {
                    task,
                    attempts,
                    source,
                } => SaveExtractError::TaskFailed {
                    task,
                    attempts,
                    source,
                },
                TaskGroupError::Cancelled => SaveExtractError::Cancelled,
            });
        }

        info!(extract_id = %extract_id, "Extract archived");
        Ok(extract_id)
    }
}
