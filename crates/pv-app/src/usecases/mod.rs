//! Business logic use cases.

pub mod get_extract;
pub mod list_extracts;
pub mod save_extract;

pub use get_extract::{ExtractDetail, GetExtractDetail};
pub use list_extracts::ListExtracts;
pub use save_extract::SaveExtractUseCase;
