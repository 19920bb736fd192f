use serde::Serialize;

use super::id_macro::impl_id;

/// Unique identifier of one archived extract.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ExtractId(String);

impl_id!(ExtractId);
