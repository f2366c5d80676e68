//! Domain models and types for the exporter.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`AppId`], [`DatasetId`])
//! - **Domain models** ([`Application`], [`DatasetMapping`])
//! - **Error types** ([`ExporterError`], [`TransportError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! ```rust
//! use dsl_exporter::domain::{AppId, DatasetId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app_id = AppId::new("app-123")?;
//! let dataset_id = DatasetId::new("dataset-456")?;
//!
//! // This won't compile - the two identifier types are distinct
//! // let wrong: AppId = dataset_id;
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod dataset;
pub mod errors;
pub mod ids;
pub mod result;

// Re-export commonly used types for convenience
pub use application::{AppMode, Application};
pub use dataset::DatasetMapping;
pub use errors::{ExporterError, TransportError};
pub use ids::{AppId, DatasetId};
pub use result::Result;
