use anyhow::Result;
use diesel::prelude::*;

use pv_core::extract::{CadastralExtract, CadastralNumber};
use pv_core::ids::ExtractId;

use crate::db::schema::t_extract;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = t_extract)]
pub struct ExtractRow {
    /// Cadastral block number, primary key of the archive.
    pub cadastral_number: String,
    pub extract_id: String,
    pub region_code: String,
    pub issued_at_ms: i64,
    pub content_hash: String,
    pub size_bytes: i64,
    /// Archival time (Unix epoch milliseconds).
    pub archived_at_ms: i64,
}

impl ExtractRow {
    pub fn into_domain(self) -> Result<CadastralExtract> {
        Ok(CadastralExtract {
            id: ExtractId::from_string(self.extract_id),
            cadastral_number: CadastralNumber::parse(&self.cadastral_number)?,
            region_code: self.region_code,
            issued_at_ms: self.issued_at_ms,
            content_hash: self.content_hash,
            size_bytes: self.size_bytes,
            archived_at_ms: self.archived_at_ms,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = t_extract)]
pub struct NewExtractRow {
    pub cadastral_number: String,
    pub extract_id: String,
    pub region_code: String,
    pub issued_at_ms: i64,
    pub content_hash: String,
    pub size_bytes: i64,
    pub archived_at_ms: i64,
}

impl NewExtractRow {
    pub fn from_domain(extract: &CadastralExtract) -> Self {
        Self {
            cadastral_number: extract.cadastral_number.to_string(),
            extract_id: extract.id.to_string(),
            region_code: extract.region_code.clone(),
            issued_at_ms: extract.issued_at_ms,
            content_hash: extract.content_hash.clone(),
            size_bytes: extract.size_bytes,
            archived_at_ms: extract.archived_at_ms,
        }
    }
}
