use serde::Serialize;

use super::id_macro::impl_id;

/// Unique identifier of one derived land-parcel record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ParcelId(String);

impl_id!(ParcelId);
