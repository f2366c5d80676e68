//! Console API client
//!
//! Lists applications and fetches their DSL export through the console's
//! internal REST API.

use super::models::{AppListPage, DslExportResponse};
use super::session::Session;
use crate::adapters::http::{build_client, check_response, join_url, PAGE_LIMIT};
use crate::domain::{AppId, Application, Result, TransportError};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use std::sync::Arc;

/// Console operations used by the exporter
#[async_trait]
pub trait ConsoleApi: Send + Sync {
    /// List every application visible to the session
    ///
    /// Pagination is handled internally; the result is the complete set.
    async fn list_applications(&self) -> Result<Vec<Application>>;

    /// Fetch the DSL document of one application
    async fn export_dsl(&self, app_id: &AppId, include_secret: bool) -> Result<String>;
}

/// Builds a [`ConsoleApi`] for an authenticated session
pub trait ConsoleConnector: Send + Sync {
    fn connect(&self, base_url: &str, session: Session) -> Result<Arc<dyn ConsoleApi>>;
}

/// [`ConsoleConnector`] producing reqwest-backed [`ConsoleClient`]s
#[derive(Debug, Clone)]
pub struct HttpConsoleConnector {
    timeout_seconds: u64,
    tls_verify: bool,
}

impl HttpConsoleConnector {
    pub fn new(timeout_seconds: u64, tls_verify: bool) -> Self {
        Self {
            timeout_seconds,
            tls_verify,
        }
    }
}

impl ConsoleConnector for HttpConsoleConnector {
    fn connect(&self, base_url: &str, session: Session) -> Result<Arc<dyn ConsoleApi>> {
        let client = ConsoleClient::new(base_url, session, self.timeout_seconds, self.tls_verify)?;
        Ok(Arc::new(client))
    }
}

/// reqwest implementation of [`ConsoleApi`]
pub struct ConsoleClient {
    base_url: String,
    client: Client,
    session: Session,
}

impl ConsoleClient {
    /// Create a client for the console at `base_url`
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built
    pub fn new(
        base_url: &str,
        session: Session,
        timeout_seconds: u64,
        tls_verify: bool,
    ) -> Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: build_client(timeout_seconds, tls_verify)?,
            session,
        })
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.session
            .auth_headers()
            .into_iter()
            .fold(self.client.get(join_url(&self.base_url, path)), |req, (name, value)| {
                req.header(name, value)
            })
    }
}

#[async_trait]
impl ConsoleApi for ConsoleClient {
    async fn list_applications(&self) -> Result<Vec<Application>> {
        let mut apps = Vec::new();
        let mut page = 1u32;

        loop {
            tracing::debug!(page = page, "Fetching application page");

            let resp = self
                .get("/console/api/apps")
                .query(&[("page", page), ("limit", PAGE_LIMIT)])
                .send()
                .await
                .map_err(TransportError::from)?;

            let resp = check_response(resp, "Listing applications").await?;
            let body: AppListPage = resp.json().await.map_err(TransportError::from)?;

            let fetched = body.data.len();
            apps.extend(body.data);

            if !body.has_more || fetched == 0 {
                break;
            }
            page += 1;
        }

        tracing::info!(count = apps.len(), "Listed console applications");
        Ok(apps)
    }

    async fn export_dsl(&self, app_id: &AppId, include_secret: bool) -> Result<String> {
        let path = format!("/console/api/apps/{}/export", app_id.as_str());

        let resp = self
            .get(&path)
            .query(&[("include_secret", include_secret)])
            .send()
            .await
            .map_err(TransportError::from)?;

        let resp = check_response(resp, &format!("Exporting DSL for app {app_id}")).await?;
        let body: DslExportResponse = resp.json().await.map_err(TransportError::from)?;

        Ok(body.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use crate::domain::{AppMode, ExporterError};
    use mockito::Matcher;

    fn session() -> Session {
        Session::from_token(secret_string("tok".to_string()))
    }

    fn client(url: &str) -> ConsoleClient {
        ConsoleClient::new(url, session(), 5, true).unwrap()
    }

    #[tokio::test]
    async fn test_list_applications_pages_until_done() {
        let mut server = mockito::Server::new_async().await;
        let page1 = server
            .mock("GET", "/console/api/apps")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page".into(), "1".into()),
                Matcher::UrlEncoded("limit".into(), "100".into()),
            ]))
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"data":[{"id":"a1","name":"First","mode":"chat"}],"has_more":true,"total":2}"#,
            )
            .create_async()
            .await;
        let page2 = server
            .mock("GET", "/console/api/apps")
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"data":[{"id":"a2","name":"Second","mode":"workflow"}],"has_more":false}"#,
            )
            .create_async()
            .await;

        let apps = client(&server.url()).list_applications().await.unwrap();

        page1.assert_async().await;
        page2.assert_async().await;
        assert_eq!(apps.len(), 2);
        assert_eq!(apps[0].name, "First");
        assert_eq!(apps[1].mode, AppMode::Workflow);
    }

    #[tokio::test]
    async fn test_export_dsl_passes_include_secret() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/console/api/apps/a1/export")
            .match_query(Matcher::UrlEncoded("include_secret".into(), "true".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":"app:\n  name: First\n"}"#)
            .create_async()
            .await;

        let dsl = client(&server.url())
            .export_dsl(&AppId::new("a1").unwrap(), true)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(dsl, "app:\n  name: First\n");
    }

    #[tokio::test]
    async fn test_export_dsl_server_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/console/api/apps/a1/export")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("internal error")
            .create_async()
            .await;

        let err = client(&server.url())
            .export_dsl(&AppId::new("a1").unwrap(), false)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ExporterError::Transport(TransportError::ServerError { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_connector_builds_client() {
        let connector = HttpConsoleConnector::new(5, true);
        assert!(connector.connect("https://dify.example.com/", session()).is_ok());
    }
}
