//! Conversion of a raw upload into the canonical extract descriptor.
//! 将原始上传转换为规范的提取件描述。

use thiserror::Error;

use crate::extract::descriptor::CadastralExtract;
use crate::extract::number::{CadastralNumber, CadastralNumberError};
use crate::extract::upload::RawExtractUpload;
use crate::ids::ExtractId;

#[derive(Debug, Error)]
pub enum ExtractValidationError {
    #[error(transparent)]
    Number(#[from] CadastralNumberError),

    #[error("region code {region:?} does not match cadastral number {number}")]
    RegionMismatch {
        region: String,
        number: CadastralNumber,
    },

    #[error("extract document payload is empty")]
    EmptyContent,

    #[error("issue timestamp must not be negative, got {0}")]
    NegativeIssuedAt(i64),
}

impl CadastralExtract {
    /// Validate the raw upload and build the canonical descriptor.
    ///
    /// Pure and synchronous; a failure here happens before any side effect.
    /// `now_ms` is stamped as the archival time so the conversion itself stays
    /// free of clock access.
    pub fn from_upload(
        upload: &RawExtractUpload,
        now_ms: i64,
    ) -> Result<Self, ExtractValidationError> {
        let number = CadastralNumber::parse(&upload.cadastral_number)?;

        if upload.region_code != number.region_code() {
            return Err(ExtractValidationError::RegionMismatch {
                region: upload.region_code.clone(),
                number,
            });
        }
        if upload.content.is_empty() {
            return Err(ExtractValidationError::EmptyContent);
        }
        if upload.issued_at_ms < 0 {
            return Err(ExtractValidationError::NegativeIssuedAt(upload.issued_at_ms));
        }

        let content_hash = blake3::hash(&upload.content).to_hex().to_string();

        Ok(CadastralExtract {
            id: ExtractId::new(),
            cadastral_number: number,
            region_code: upload.region_code.clone(),
            issued_at_ms: upload.issued_at_ms,
            content_hash,
            size_bytes: upload.content.len() as i64,
            archived_at_ms: now_ms,
        })
    }
}
