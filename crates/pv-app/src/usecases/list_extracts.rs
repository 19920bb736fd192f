use std::sync::Arc;

use anyhow::Result;

use pv_core::extract::CadastralExtract;
use pv_core::ports::ExtractRepositoryPort;

const MAX_PAGE_SIZE: usize = 200;

/// Use case for listing recently archived extracts, newest first.
pub struct ListExtracts {
    extract_repo: Arc<dyn ExtractRepositoryPort>,
}

impl ListExtracts {
    pub fn from_ports(extract_repo: Arc<dyn ExtractRepositoryPort>) -> Self {
        Self { extract_repo }
    }

    pub async fn execute(&self, limit: usize, offset: usize) -> Result<Vec<CadastralExtract>> {
        let limit = limit.min(MAX_PAGE_SIZE);
        self.extract_repo.list_recent(limit, offset).await
    }
}
