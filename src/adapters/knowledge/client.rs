//! Knowledge API client
//!
//! Lists the datasets visible to a knowledge API key. Only IDs and names are
//! kept; they feed the placeholder table.

use super::models::DatasetListPage;
use crate::adapters::http::{build_client, check_response, join_url, PAGE_LIMIT};
use crate::config::SecretString;
use crate::domain::{DatasetId, DatasetMapping, Result, TransportError};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use std::sync::Arc;

/// Knowledge API endpoint and key
#[derive(Debug, Clone)]
pub struct DatasetApiConfig {
    /// Base URL, e.g. `https://api.dify.ai/v1`
    pub api_url: String,
    /// Knowledge API key
    pub api_key: SecretString,
}

impl DatasetApiConfig {
    pub fn new(api_url: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            api_url: api_url.into(),
            api_key,
        }
    }
}

/// Source of the dataset table
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// List every dataset, following pagination
    async fn list_datasets(&self) -> Result<Vec<DatasetMapping>>;
}

/// Builds a [`DatasetSource`] for a knowledge API configuration
pub trait DatasetConnector: Send + Sync {
    fn connect(&self, config: &DatasetApiConfig) -> Result<Arc<dyn DatasetSource>>;
}

/// [`DatasetConnector`] producing reqwest-backed [`KnowledgeClient`]s
#[derive(Debug, Clone)]
pub struct HttpDatasetConnector {
    timeout_seconds: u64,
    tls_verify: bool,
}

impl HttpDatasetConnector {
    pub fn new(timeout_seconds: u64, tls_verify: bool) -> Self {
        Self {
            timeout_seconds,
            tls_verify,
        }
    }
}

impl DatasetConnector for HttpDatasetConnector {
    fn connect(&self, config: &DatasetApiConfig) -> Result<Arc<dyn DatasetSource>> {
        let client = KnowledgeClient::new(config.clone(), self.timeout_seconds, self.tls_verify)?;
        Ok(Arc::new(client))
    }
}

/// reqwest implementation of [`DatasetSource`]
pub struct KnowledgeClient {
    config: DatasetApiConfig,
    client: Client,
}

impl KnowledgeClient {
    /// Create a client for the knowledge API
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built
    pub fn new(config: DatasetApiConfig, timeout_seconds: u64, tls_verify: bool) -> Result<Self> {
        Ok(Self {
            config,
            client: build_client(timeout_seconds, tls_verify)?,
        })
    }
}

#[async_trait]
impl DatasetSource for KnowledgeClient {
    async fn list_datasets(&self) -> Result<Vec<DatasetMapping>> {
        let url = join_url(&self.config.api_url, "/datasets");
        let mut datasets = Vec::new();
        let mut page = 1u32;

        loop {
            tracing::debug!(page = page, "Fetching dataset page");

            let resp = self
                .client
                .get(&url)
                .bearer_auth(self.config.api_key.expose_secret().as_str())
                .query(&[("page", page), ("limit", PAGE_LIMIT)])
                .send()
                .await
                .map_err(TransportError::from)?;

            let resp = check_response(resp, "Listing datasets").await?;
            let body: DatasetListPage = resp.json().await.map_err(TransportError::from)?;

            let fetched = body.data.len();
            for item in body.data {
                match DatasetId::new(item.id) {
                    Ok(id) => datasets.push(DatasetMapping::new(id, item.name)),
                    Err(e) => tracing::warn!(name = %item.name, error = %e, "Skipping dataset"),
                }
            }

            if !body.has_more || fetched == 0 {
                break;
            }
            page += 1;
        }

        tracing::info!(count = datasets.len(), "Listed knowledge datasets");
        Ok(datasets)
    }
}
