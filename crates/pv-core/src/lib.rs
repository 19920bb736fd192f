//! # pv-core
//!
//! Core domain models and business logic for Plotvault.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

// Public module exports
pub mod errors;
pub mod extract;
pub mod ids;
pub mod ports;

// Re-export commonly used types at the crate root
pub use errors::SaveExtractError;
pub use extract::{
    CadastralExtract, CadastralNumber, CadastralNumberError, ExtractValidationError, LandParcel,
    RawExtractUpload,
};
pub use ids::{ExtractId, ParcelId};
