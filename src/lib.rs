// dsl-exporter - Console DSL bulk exporter
// Copyright (c) 2025 dsl-exporter Contributors
// Licensed under the MIT License

//! # dsl-exporter - Console DSL bulk exporter
//!
//! dsl-exporter downloads the DSL document of every application hosted on a
//! console instance and writes each one to a directory, optionally alongside
//! a normalized copy whose knowledge base references are portable between
//! environments.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Authenticating** against the console with a password login or a pre-issued token
//! - **Listing** applications and exporting their DSL documents
//! - **Normalizing** dataset IDs into name-derived placeholders
//! - **Restoring** placeholders against the datasets of another environment
//!
//! ## Architecture
//!
//! dsl-exporter follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (export orchestration, transform, sanitizing)
//! - [`adapters`] - External integrations (console API, knowledge API)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dsl_exporter::config::load_config;
//! use dsl_exporter::core::export::{ExportBackends, ExportCoordinator, ExportOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("dsl-exporter.toml")?;
//!
//!     let options = ExportOptions::new(&config.console.base_url, &config.export.output_dir)
//!         .with_headless(true);
//!     let backends = ExportBackends::http(
//!         config.console.timeout_seconds,
//!         config.console.tls_verify,
//!         config.console.access_token.clone(),
//!     );
//!
//!     let run = ExportCoordinator::new(options, backends).execute_export().await?;
//!
//!     println!("Exported {} of {} applications", run.success_count(), run.total());
//!     Ok(())
//! }
//! ```
//!
//! ## Dataset Placeholders
//!
//! ```rust
//! use dsl_exporter::core::transform::{replace_dataset_ids, restore_dataset_ids, PlaceholderTable};
//! use dsl_exporter::domain::{DatasetId, DatasetMapping};
//!
//! let production = PlaceholderTable::from_datasets(&[DatasetMapping::new(
//!     DatasetId::new("prod-faq").unwrap(),
//!     "FAQ",
//! )]);
//! let staging = PlaceholderTable::from_datasets(&[DatasetMapping::new(
//!     DatasetId::new("staging-faq").unwrap(),
//!     "FAQ",
//! )]);
//!
//! let normalized = replace_dataset_ids("dataset_id: prod-faq\n", &production);
//! assert_eq!(normalized, "dataset_id: '{{#dataset.faq#}}'\n");
//! assert_eq!(restore_dataset_ids(&normalized, &staging), "dataset_id: staging-faq\n");
//! ```
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`domain::Result`], whose error type is
//! [`domain::ExporterError`]. A run-level error aborts the export; failures
//! of individual applications are reported in the returned
//! [`core::export::ExportRun`].

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
