use anyhow::Result;

use crate::extract::{CadastralExtract, CadastralNumber};

/// Metadata store for archived extracts.
#[async_trait::async_trait]
pub trait ExtractRepositoryPort: Send + Sync {
    /// Whether an extract with this block number is already archived.
    /// Read-only; the save flow uses it as its idempotency gate.
    async fn exists(&self, number: &CadastralNumber) -> Result<bool>;

    async fn insert_metadata(&self, extract: &CadastralExtract) -> Result<()>;

    async fn get_by_number(&self, number: &CadastralNumber) -> Result<Option<CadastralExtract>>;

    async fn list_recent(&self, limit: usize, offset: usize) -> Result<Vec<CadastralExtract>>;
}
