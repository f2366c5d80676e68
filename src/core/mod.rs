//! Core business logic.
//!
//! # Modules
//!
//! - [`export`] - Export orchestration, options, writing and reporting
//! - [`transform`] - Dataset ID to placeholder normalization
//! - [`sanitize`] - Filesystem-safe names for exported documents
//!
//! # Export Workflow
//!
//! 1. **Authenticate**: Acquire one console session
//! 2. **List**: Fetch every application, then apply the filter
//! 3. **Load Datasets** (optional): Build the placeholder table
//! 4. **Export**: Fetch each application's DSL in turn
//! 5. **Write**: Raw document, plus the normalized one when datasets are loaded
//! 6. **Report**: Per-application results and a run summary
//!
//! # Example
//!
//! ```rust,no_run
//! use dsl_exporter::core::export::{ExportBackends, ExportCoordinator, ExportOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = ExportOptions::new("https://dify.example.com", "./dsl").with_headless(true);
//! let backends = ExportBackends::http(60, true, None);
//!
//! let run = ExportCoordinator::new(options, backends).execute_export().await?;
//!
//! println!("Exported: {}", run.success_count());
//! println!("Failed: {}", run.failure_count());
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod sanitize;
pub mod transform;
