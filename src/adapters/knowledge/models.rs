//! Knowledge API wire models

use serde::Deserialize;

/// One page of `GET /datasets`
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetListPage {
    #[serde(default)]
    pub data: Vec<DatasetItem>,

    #[serde(default)]
    pub has_more: bool,
}

/// Dataset entry; the API returns many more fields, only these are read
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetItem {
    pub id: String,

    #[serde(default)]
    pub name: String,
}
