use anyhow::Result;

use crate::extract::{CadastralNumber, LandParcel, RawExtractUpload};

/// Generator and writer of the land-parcel records derived from an extract
/// document. Parsing and persistence sit behind one port; the save flow only
/// sees a single fallible, retryable operation.
#[async_trait::async_trait]
pub trait ParcelWriterPort: Send + Sync {
    async fn save_from_extract(&self, upload: &RawExtractUpload) -> Result<()>;
}

#[async_trait::async_trait]
pub trait ParcelReaderPort: Send + Sync {
    async fn list_for_extract(&self, number: &CadastralNumber) -> Result<Vec<LandParcel>>;
}
