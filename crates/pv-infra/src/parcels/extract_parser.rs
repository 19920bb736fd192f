//! Derivation of land-parcel records from an extract document.
//! 从提取件文档派生地块记录。

use anyhow::{Context, Result};
use serde::Deserialize;

use pv_core::extract::LandParcel;
use pv_core::ids::ParcelId;

#[derive(Debug, Deserialize)]
struct ExtractDocument {
    parcels: Vec<ParcelRecord>,
}

#[derive(Debug, Deserialize)]
struct ParcelRecord {
    cadastral_number: String,
    area_sq_m: f64,
    category: String,
    #[serde(default)]
    permitted_use: Option<String>,
}

/// Parse the parcel section of an extract document payload.
///
/// The document must be a JSON object with a `parcels` array; an extract with
/// no parcels in its block is a valid, empty list.
pub fn parse_parcels(payload: &[u8]) -> Result<Vec<LandParcel>> {
    let document: ExtractDocument =
        serde_json::from_slice(payload).context("extract document is not a valid parcel listing")?;

    let mut parcels = Vec::with_capacity(document.parcels.len());
    for record in document.parcels {
        if record.cadastral_number.trim().is_empty() {
            return Err(anyhow::anyhow!("parcel record has an empty cadastral number"));
        }
        if !record.area_sq_m.is_finite() || record.area_sq_m <= 0.0 {
            return Err(anyhow::anyhow!(
                "parcel {} has a non-positive area {}",
                record.cadastral_number,
                record.area_sq_m
            ));
        }

        parcels.push(LandParcel {
            id: ParcelId::new(),
            parcel_number: record.cadastral_number,
            area_sq_m: record.area_sq_m,
            category: record.category,
            permitted_use: record.permitted_use,
        });
    }

    Ok(parcels)
}
