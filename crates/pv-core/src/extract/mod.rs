//! Cadastral extract domain model.

pub mod convert;
pub mod descriptor;
pub mod number;
pub mod parcel;
pub mod upload;

pub use convert::ExtractValidationError;
pub use descriptor::CadastralExtract;
pub use number::{CadastralNumber, CadastralNumberError};
pub use parcel::LandParcel;
pub use upload::RawExtractUpload;
