use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use pv_core::extract::{CadastralExtract, CadastralNumber, LandParcel};
use pv_core::ports::{ExtractRepositoryPort, ParcelReaderPort};

/// One archived extract together with its derived parcels.
#[derive(Debug, Serialize)]
pub struct ExtractDetail {
    pub extract: CadastralExtract,
    pub parcels: Vec<LandParcel>,
}

/// Use case for reading one archived extract back in full.
pub struct GetExtractDetail {
    extract_repo: Arc<dyn ExtractRepositoryPort>,
    parcel_reader: Arc<dyn ParcelReaderPort>,
}

impl GetExtractDetail {
    pub fn from_ports(
        extract_repo: Arc<dyn ExtractRepositoryPort>,
        parcel_reader: Arc<dyn ParcelReaderPort>,
    ) -> Self {
        Self {
            extract_repo,
            parcel_reader,
        }
    }

    #[tracing::instrument(
        name = "usecase.get_extract_detail.execute",
        skip(self),
        fields(cadastral_number = %number)
    )]
    pub async fn execute(&self, number: &CadastralNumber) -> Result<Option<ExtractDetail>> {
        let Some(extract) = self.extract_repo.get_by_number(number).await? else {
            return Ok(None);
        };

        let parcels = self.parcel_reader.list_for_extract(number).await?;
        info!(parcels = parcels.len(), "Loaded extract detail");
        Ok(Some(ExtractDetail { extract, parcels }))
    }
}
