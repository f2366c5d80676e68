//! Knowledge base (dataset) model

use super::ids::DatasetId;
use serde::{Deserialize, Serialize};

/// A dataset visible to the knowledge API key
///
/// Only the identifier and the human-readable name matter to the exporter:
/// the name is what placeholders are derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetMapping {
    /// Dataset identifier
    pub id: DatasetId,

    /// Dataset display name
    pub name: String,
}

impl DatasetMapping {
    /// Create a new dataset mapping
    pub fn new(id: DatasetId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
