//! Domain identifier types with validation
//!
//! Newtype wrappers for the console's opaque identifiers. Keeping application
//! and dataset IDs as distinct types prevents passing one where the other is
//! expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Application identifier newtype wrapper
///
/// Identifies one application in the console. Usually a UUID, but treated as
/// an opaque string.
///
/// # Examples
///
/// ```
/// use dsl_exporter::domain::ids::AppId;
/// use std::str::FromStr;
///
/// let app_id = AppId::from_str("a3c1e2b4-5d6f-4a7b-8c9d-0e1f2a3b4c5d").unwrap();
/// assert_eq!(app_id.as_str(), "a3c1e2b4-5d6f-4a7b-8c9d-0e1f2a3b4c5d");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppId(String);

impl AppId {
    /// Creates a new AppId from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(AppId)` if the ID is non-empty, `Err` otherwise
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Application ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the application ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AppId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for AppId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Dataset (knowledge base) identifier newtype wrapper
///
/// These are the environment-specific values that get replaced by
/// placeholders in normalized DSL documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetId(String);

impl DatasetId {
    /// Creates a new DatasetId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Dataset ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the dataset ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DatasetId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for DatasetId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
