use serde::Serialize;

use crate::ids::ParcelId;

/// Land-parcel record derived from an extract document.
#[derive(Debug, Clone, Serialize)]
pub struct LandParcel {
    pub id: ParcelId,
    /// Full parcel number, e.g. `47:14:1203001:101`.
    pub parcel_number: String,
    pub area_sq_m: f64,
    /// Land category as stated in the extract.
    pub category: String,
    pub permitted_use: Option<String>,
}
