use serde::Serialize;

use crate::extract::number::CadastralNumber;
use crate::ids::ExtractId;

/// Canonical descriptor of one extract, derived once from the raw upload.
///
/// Owned by the save flow for the duration of one request and never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct CadastralExtract {
    pub id: ExtractId,
    pub cadastral_number: CadastralNumber,
    pub region_code: String,
    pub issued_at_ms: i64,
    /// Blake3 hex digest of the document payload.
    pub content_hash: String,
    pub size_bytes: i64,
    pub archived_at_ms: i64,
}
