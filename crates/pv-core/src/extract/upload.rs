use bytes::Bytes;

/// Caller-supplied extract submission, exactly as received.
///
/// Read by several concurrent save tasks, so the payload uses [`Bytes`] and the
/// whole value is shared behind an `Arc` once the save fans out. Never mutated.
#[derive(Debug, Clone)]
pub struct RawExtractUpload {
    /// Cadastral block number as submitted, not yet validated.
    pub cadastral_number: String,
    /// Two-digit region code the extract was issued for.
    pub region_code: String,
    /// Issue timestamp of the extract (Unix epoch milliseconds).
    pub issued_at_ms: i64,
    /// Raw extract document bytes.
    pub content: Bytes,
    /// MIME type of the document payload.
    pub content_type: String,
}
