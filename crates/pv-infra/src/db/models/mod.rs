mod extract_row;
mod land_parcel_row;

pub use extract_row::{ExtractRow, NewExtractRow};
pub use land_parcel_row::{LandParcelRow, NewLandParcelRow};
