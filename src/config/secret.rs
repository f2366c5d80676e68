//! Credential handling using the secrecy crate
//!
//! Console passwords, console access tokens and knowledge API keys are kept
//! in [`SecretString`]. The wrapped value is zeroed on drop, redacted in
//! `Debug` output, and only reachable through `expose_secret()`.
//!
//! # Example
//!
//! ```rust
//! use dsl_exporter::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let api_key = secret_string("dataset-0123456789".to_string());
//! assert_eq!(api_key.expose_secret().as_ref(), "dataset-0123456789");
//! assert!(!format!("{api_key:?}").contains("0123456789"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, ExposeSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// Newtype wrapper for String that implements the required traits for Secret
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// Check if the secret value is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the value as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Type alias for a secret string
pub type SecretString = Secret<SecretValue>;

/// Wrap a String in a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

/// Masked rendering of a secret for human-facing summaries
///
/// Only tells whether a value is present; no character of it is shown.
pub fn redact(secret: &SecretString) -> String {
    if secret.expose_secret().as_str().is_empty() {
        "(empty)".to_string()
    } else {
        "********".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_string_creation() {
        let secret = secret_string("test-password".to_string());
        assert_eq!(secret.expose_secret(), "test-password");
    }

    #[test]
    fn test_secret_debug_redacted() {
        let secret = secret_string("sensitive-data".to_string());
        let debug_output = format!("{secret:?}");

        assert!(!debug_output.contains("sensitive-data"));
        assert!(debug_output.contains("REDACTED") || debug_output.contains("Secret"));
    }

    #[test]
    fn test_secret_deserialize_from_toml() {
        #[derive(Deserialize)]
        struct Section {
            api_key: SecretString,
        }

        let section: Section = toml::from_str("api_key = \"dataset-xyz\"").unwrap();
        assert_eq!(section.api_key.expose_secret().as_str(), "dataset-xyz");
    }

    #[test]
    fn test_redact_hides_every_character() {
        let value = "Tr0ub4dor&3xyz";
        let masked = redact(&secret_string(value.to_string()));

        assert_eq!(masked, "********");
        assert!(value.chars().all(|c| !masked.contains(c)));
    }

    #[test]
    fn test_redact_short_and_empty() {
        assert_eq!(redact(&secret_string("abc".to_string())), "********");
        assert_eq!(redact(&secret_string(String::new())), "(empty)");
    }
}
