mod extract_repo;
mod parcel_repo;

pub use extract_repo::DieselExtractRepository;
pub use parcel_repo::DieselParcelRepository;
