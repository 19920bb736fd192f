//! ID type wrappers for type safety.

pub mod extract_id;
pub mod parcel_id;

mod id_macro;

pub use extract_id::ExtractId;
pub use parcel_id::ParcelId;
