use diesel::prelude::*;

use pv_core::extract::LandParcel;
use pv_core::ids::ParcelId;

use crate::db::schema::t_land_parcel;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = t_land_parcel)]
pub struct LandParcelRow {
    pub id: String,
    /// Block number of the extract this parcel was derived from.
    pub extract_number: String,
    pub parcel_number: String,
    pub area_sq_m: f64,
    pub category: String,
    pub permitted_use: Option<String>,
}

impl LandParcelRow {
    pub fn into_domain(self) -> LandParcel {
        LandParcel {
            id: ParcelId::from_string(self.id),
            parcel_number: self.parcel_number,
            area_sq_m: self.area_sq_m,
            category: self.category,
            permitted_use: self.permitted_use,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = t_land_parcel)]
pub struct NewLandParcelRow {
    pub id: String,
    pub extract_number: String,
    pub parcel_number: String,
    pub area_sq_m: f64,
    pub category: String,
    pub permitted_use: Option<String>,
}

impl NewLandParcelRow {
    pub fn from_domain(extract_number: &str, parcel: &LandParcel) -> Self {
        Self {
            id: parcel.id.to_string(),
            extract_number: extract_number.to_string(),
            parcel_number: parcel.parcel_number.clone(),
            area_sq_m: parcel.area_sq_m,
            category: parcel.category.clone(),
            permitted_use: parcel.permitted_use.clone(),
        }
    }
}
