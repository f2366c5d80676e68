//! Export orchestration
//!
//! This module provides the core export logic, including:
//! - Run options and application filtering
//! - Export coordination and orchestration
//! - Writing documents to the output directory
//! - Per-application results and run reporting

pub mod coordinator;
pub mod options;
pub mod summary;
pub mod writer;

pub use crate::adapters::knowledge::DatasetApiConfig;
pub use coordinator::{ExportBackends, ExportCoordinator};
pub use options::{AppFilter, AppFilterBuilder, ExportOptions, NormalizationMode};
pub use summary::{ExportResult, ExportRun};
pub use writer::DslWriter;
