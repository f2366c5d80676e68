//! Knowledge API adapter

pub mod client;
pub mod models;

pub use client::{
    DatasetApiConfig, DatasetConnector, DatasetSource, HttpDatasetConnector, KnowledgeClient,
};
