use anyhow::Result;

use crate::extract::RawExtractUpload;

/// Durable store for the raw extract document bytes.
#[async_trait::async_trait]
pub trait ExtractBlobStorePort: Send + Sync {
    /// Persist the document payload. Must be safe to call again for the same
    /// payload: the save flow retries this on transient failure.
    async fn upload(&self, upload: &RawExtractUpload) -> Result<()>;
}
