//! Port interfaces for the application layer.
//!
//! Ports define the contract between the application logic (use cases)
//! and infrastructure implementations, keeping the core business logic
//! independent of external dependencies.

mod blob_store;
mod clock;
mod extract_repository;
mod parcels;
mod telemetry;

pub use blob_store::ExtractBlobStorePort;
pub use clock::ClockPort;
pub use extract_repository::ExtractRepositoryPort;
pub use parcels::{ParcelReaderPort, ParcelWriterPort};
pub use telemetry::TelemetryPort;
