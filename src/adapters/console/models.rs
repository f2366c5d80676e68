//! Console API wire models

use crate::domain::Application;
use serde::{Deserialize, Serialize};

/// One page of `GET /console/api/apps`
#[derive(Debug, Clone, Deserialize)]
pub struct AppListPage {
    /// Applications on this page
    #[serde(default)]
    pub data: Vec<Application>,

    /// Whether another page follows
    #[serde(default)]
    pub has_more: bool,

    /// Total number of applications, when reported
    #[serde(default)]
    pub total: Option<u64>,
}

/// Body of `GET /console/api/apps/{id}/export`
#[derive(Debug, Clone, Deserialize)]
pub struct DslExportResponse {
    /// The DSL document as YAML text
    pub data: String,
}

/// Body of `POST /console/api/login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub language: &'a str,
    pub remember_me: bool,
}

/// Response of `POST /console/api/login`
///
/// Older consoles return the token in `data` (as a bare string or as
/// `data.access_token`); newer ones only set cookies.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub result: Option<String>,

    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl LoginResponse {
    /// Access token carried in the body, if any
    pub fn access_token(&self) -> Option<String> {
        match self.data.as_ref()? {
            serde_json::Value::String(token) => Some(token.clone()),
            serde_json::Value::Object(map) => map
                .get("access_token")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            _ => None,
        }
    }

    /// Whether the console reported a failed login in the body
    pub fn is_failure(&self) -> bool {
        self.result.as_deref().is_some_and(|r| r != "success")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AppMode;

    #[test]
    fn test_app_list_page_deserialize() {
        let json = r#"{
            "page": 1,
            "limit": 100,
            "total": 2,
            "has_more": false,
            "data": [
                {"id": "a1", "name": "Support Bot", "mode": "advanced-chat"},
                {"id": "a2", "name": "Summarizer", "mode": "workflow", "description": "x"}
            ]
        }"#;

        let page: AppListPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[1].mode, AppMode::Workflow);
        assert!(!page.has_more);
        assert_eq!(page.total, Some(2));
    }

    #[test]
    fn test_login_response_variants() {
        let legacy: LoginResponse =
            serde_json::from_str(r#"{"result":"success","data":{"access_token":"tok"}}"#).unwrap();
        assert_eq!(legacy.access_token().as_deref(), Some("tok"));
        assert!(!legacy.is_failure());

        let bare: LoginResponse =
            serde_json::from_str(r#"{"result":"success","data":"tok2"}"#).unwrap();
        assert_eq!(bare.access_token().as_deref(), Some("tok2"));

        let cookie_only: LoginResponse = serde_json::from_str(r#"{"result":"success"}"#).unwrap();
        assert!(cookie_only.access_token().is_none());

        let failed: LoginResponse =
            serde_json::from_str(r#"{"result":"fail","data":"Invalid email or password"}"#)
                .unwrap();
        assert!(failed.is_failure());
    }
}
