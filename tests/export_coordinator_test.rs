//! Integration tests for the export coordinator
//!
//! The console, session and knowledge collaborators are replaced with
//! in-memory fakes so that every run is deterministic and offline.

use async_trait::async_trait;
use dsl_exporter::adapters::console::{
    ConsoleApi, ConsoleConnector, Credentials, Session, SessionProvider,
};
use dsl_exporter::adapters::knowledge::{DatasetApiConfig, DatasetConnector, DatasetSource};
use dsl_exporter::config::secret_string;
use dsl_exporter::core::export::{
    AppFilterBuilder, ExportBackends, ExportCoordinator, ExportOptions, NormalizationMode,
};
use dsl_exporter::core::transform::replace_dataset_ids;
use dsl_exporter::domain::{
    AppId, AppMode, Application, DatasetId, DatasetMapping, ExporterError, Result,
    TransportError,
};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const FAQ_ID: &str = "0b3c7a6e-1f2d-4c5b-9a8e-7d6c5b4a3f21";

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

struct FakeSessions {
    fail: bool,
}

#[async_trait]
impl SessionProvider for FakeSessions {
    async fn acquire(
        &self,
        _base_url: &str,
        _credentials: Option<&Credentials>,
        _headless: bool,
    ) -> Result<Session> {
        if self.fail {
            return Err(ExporterError::Authentication(
                "Console rejected login".to_string(),
            ));
        }
        Ok(Session::from_token(secret_string("console-token".to_string())))
    }
}

#[derive(Default)]
struct FakeConsole {
    apps: Vec<Application>,
    documents: HashMap<String, String>,
    failing: Vec<String>,
    export_calls: Mutex<Vec<(String, bool)>>,
}

impl FakeConsole {
    fn with_app(mut self, id: &str, name: &str, mode: AppMode, dsl: &str) -> Self {
        self.apps
            .push(Application::new(AppId::new(id).unwrap(), name, mode));
        self.documents.insert(id.to_string(), dsl.to_string());
        self
    }

    fn failing(mut self, id: &str) -> Self {
        self.failing.push(id.to_string());
        self
    }

    fn export_calls(&self) -> Vec<(String, bool)> {
        self.export_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConsoleApi for FakeConsole {
    async fn list_applications(&self) -> Result<Vec<Application>> {
        Ok(self.apps.clone())
    }

    async fn export_dsl(&self, app_id: &AppId, include_secret: bool) -> Result<String> {
        self.export_calls
            .lock()
            .unwrap()
            .push((app_id.as_str().to_string(), include_secret));

        if self.failing.iter().any(|id| id == app_id.as_str()) {
            return Err(TransportError::ServerError {
                status: 500,
                message: "export failed".to_string(),
            }
            .into());
        }

        self.documents
            .get(app_id.as_str())
            .cloned()
            .ok_or_else(|| TransportError::NotFound(app_id.to_string()).into())
    }
}

struct FakeConsoleConnector(Arc<FakeConsole>);

impl ConsoleConnector for FakeConsoleConnector {
    fn connect(&self, _base_url: &str, _session: Session) -> Result<Arc<dyn ConsoleApi>> {
        Ok(self.0.clone())
    }
}

struct FakeDatasets(Result<Vec<DatasetMapping>>);

#[async_trait]
impl DatasetSource for FakeDatasets {
    async fn list_datasets(&self) -> Result<Vec<DatasetMapping>> {
        match self.0 {
            Ok(ref datasets) => Ok(datasets.clone()),
            Err(_) => Err(ExporterError::Authentication("Invalid API key".to_string())),
        }
    }
}

struct FakeDatasetConnector {
    datasets: Option<Vec<DatasetMapping>>,
}

impl DatasetConnector for FakeDatasetConnector {
    fn connect(&self, _config: &DatasetApiConfig) -> Result<Arc<dyn DatasetSource>> {
        let result = self
            .datasets
            .clone()
            .ok_or_else(|| ExporterError::Authentication("Invalid API key".to_string()));
        Ok(Arc::new(FakeDatasets(result)))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn backends(console: Arc<FakeConsole>, datasets: Option<Vec<DatasetMapping>>) -> ExportBackends {
    ExportBackends {
        sessions: Arc::new(FakeSessions { fail: false }),
        consoles: Arc::new(FakeConsoleConnector(console)),
        datasets: Arc::new(FakeDatasetConnector { datasets }),
    }
}

fn options(output_dir: &Path) -> ExportOptions {
    ExportOptions::new("https://dify.example.com", output_dir).with_headless(true)
}

fn normalization() -> NormalizationMode {
    NormalizationMode::Enabled(DatasetApiConfig::new(
        "https://dify.example.com/v1",
        secret_string("dataset-key".to_string()),
    ))
}

fn faq_dataset() -> Vec<DatasetMapping> {
    vec![DatasetMapping::new(DatasetId::new(FAQ_ID).unwrap(), "FAQ")]
}

fn read(path: impl AsRef<Path>) -> String {
    std::fs::read_to_string(path).unwrap()
}

fn workflow_dsl() -> String {
    format!(
        "app:\n  mode: workflow\n  name: FAQ Bot\nworkflow:\n  graph:\n    nodes:\n    - data:\n        dataset_ids:\n        - {FAQ_ID}\n        type: knowledge-retrieval\n      id: '1711528914102'\n"
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_empty_application_list() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("dsl");
    let console = Arc::new(FakeConsole::default());

    let run = ExportCoordinator::new(options(&output), backends(console.clone(), None))
        .execute_export()
        .await
        .unwrap();

    assert_eq!(run.total(), 0);
    assert!(run.is_successful());
    assert!(output.is_dir());
    assert!(console.export_calls().is_empty());
}

#[tokio::test]
async fn test_raw_document_written_byte_for_byte() {
    let dir = TempDir::new().unwrap();
    let dsl = "app:\n  name: \"FAQ Bot\"\r\n  mode: chat\n# trailing comment\n";
    let console = Arc::new(FakeConsole::default().with_app("app-1", "FAQ Bot", AppMode::Chat, dsl));

    let run = ExportCoordinator::new(options(dir.path()), backends(console, None))
        .execute_export()
        .await
        .unwrap();

    assert_eq!(run.success_count(), 1);
    assert_eq!(run.results[0].filename, "faq-bot.yml");
    assert_eq!(read(dir.path().join("faq-bot.yml")), dsl);
    assert!(!dir.path().join("faq-bot.normalized.yml").exists());
    assert!(!run.normalization_enabled);
}

#[tokio::test]
async fn test_results_follow_listing_order_and_isolate_failures() {
    let dir = TempDir::new().unwrap();
    let console = Arc::new(
        FakeConsole::default()
            .with_app("app-1", "First", AppMode::Chat, "a: 1\n")
            .with_app("app-2", "Second", AppMode::Workflow, "b: 2\n")
            .with_app("app-3", "Third", AppMode::Completion, "c: 3\n")
            .failing("app-2"),
    );

    let run = ExportCoordinator::new(options(dir.path()), backends(console.clone(), None))
        .execute_export()
        .await
        .unwrap();

    let ids: Vec<&str> = run.results.iter().map(|r| r.app_id.as_str()).collect();
    assert_eq!(ids, vec!["app-1", "app-2", "app-3"]);

    assert!(run.results[0].success);
    assert!(!run.results[1].success);
    assert!(run.results[1].error.as_deref().unwrap().contains("500"));
    assert!(run.results[2].success);

    assert_eq!(run.failure_count(), 1);
    assert!(!run.is_successful());
    assert!(dir.path().join("first.yml").exists());
    assert!(!dir.path().join("second.yml").exists());
    assert!(dir.path().join("third.yml").exists());
    assert_eq!(console.export_calls().len(), 3);
}

#[tokio::test]
async fn test_filter_matching_nothing_exports_nothing() {
    let dir = TempDir::new().unwrap();
    let console = Arc::new(
        FakeConsole::default()
            .with_app("app-1", "First", AppMode::Chat, "a: 1\n")
            .with_app("app-2", "Second", AppMode::Chat, "b: 2\n"),
    );
    let filter = AppFilterBuilder::new()
        .modes(&["workflow"])
        .unwrap()
        .build();

    let run = ExportCoordinator::new(
        options(dir.path()).with_filter(filter),
        backends(console.clone(), None),
    )
    .execute_export()
    .await
    .unwrap();

    assert_eq!(run.total(), 0);
    assert!(console.export_calls().is_empty());
}

#[tokio::test]
async fn test_filter_keeps_matching_applications() {
    let dir = TempDir::new().unwrap();
    let console = Arc::new(
        FakeConsole::default()
            .with_app("app-1", "prod-faq", AppMode::Chat, "a: 1\n")
            .with_app("app-2", "dev-faq", AppMode::Chat, "b: 2\n")
            .with_app("app-3", "prod-flow", AppMode::Workflow, "c: 3\n"),
    );
    let filter = AppFilterBuilder::new()
        .name_pattern(Some("^prod-"))
        .unwrap()
        .build();

    let run = ExportCoordinator::new(
        options(dir.path()).with_filter(filter),
        backends(console.clone(), None),
    )
    .execute_export()
    .await
    .unwrap();

    let names: Vec<&str> = run.results.iter().map(|r| r.app_name.as_str()).collect();
    assert_eq!(names, vec!["prod-faq", "prod-flow"]);
    assert_eq!(console.export_calls().len(), 2);
}

#[tokio::test]
async fn test_include_secret_is_passed_through() {
    let dir = TempDir::new().unwrap();
    let console =
        Arc::new(FakeConsole::default().with_app("app-1", "First", AppMode::Chat, "a: 1\n"));

    ExportCoordinator::new(
        options(dir.path()).with_include_secret(true),
        backends(console.clone(), None),
    )
    .execute_export()
    .await
    .unwrap();

    assert_eq!(console.export_calls(), vec![("app-1".to_string(), true)]);
}

#[tokio::test]
async fn test_nested_output_directory_is_created() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("exports").join("2026").join("prod");
    let console =
        Arc::new(FakeConsole::default().with_app("app-1", "First", AppMode::Chat, "a: 1\n"));

    let run = ExportCoordinator::new(options(&output), backends(console, None))
        .execute_export()
        .await
        .unwrap();

    assert!(run.is_successful());
    assert!(output.join("first.yml").exists());
}

#[tokio::test]
async fn test_output_path_that_is_a_file_aborts_run() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("not-a-dir");
    std::fs::write(&output, "occupied").unwrap();
    let console =
        Arc::new(FakeConsole::default().with_app("app-1", "First", AppMode::Chat, "a: 1\n"));

    let result = ExportCoordinator::new(options(&output), backends(console.clone(), None))
        .execute_export()
        .await;

    assert!(matches!(result, Err(ExporterError::Io(_))));
    assert!(console.export_calls().is_empty());
}

#[tokio::test]
async fn test_normalized_document_written() {
    let dir = TempDir::new().unwrap();
    let dsl = workflow_dsl();
    let console =
        Arc::new(FakeConsole::default().with_app("app-1", "FAQ Bot", AppMode::Workflow, &dsl));

    let run = ExportCoordinator::new(
        options(dir.path()).with_normalization(normalization()),
        backends(console, Some(faq_dataset())),
    )
    .execute_export()
    .await
    .unwrap();

    assert!(run.normalization_enabled);
    assert_eq!(run.results[0].filename, "faq-bot.yml");
    assert_eq!(read(dir.path().join("faq-bot.yml")), dsl);

    let normalized = read(dir.path().join("faq-bot.normalized.yml"));
    assert!(!normalized.contains(FAQ_ID));
    assert!(normalized.contains("        - '{{#dataset.faq#}}'\n"));
    assert_eq!(normalized, dsl.replace(FAQ_ID, "'{{#dataset.faq#}}'"));

    // Normalizing the normalized output again changes nothing
    let table = dsl_exporter::core::transform::PlaceholderTable::from_datasets(&faq_dataset());
    assert_eq!(replace_dataset_ids(&normalized, &table), normalized);
}

#[tokio::test]
async fn test_empty_dataset_listing_disables_normalization() {
    let dir = TempDir::new().unwrap();
    let dsl = workflow_dsl();
    let console =
        Arc::new(FakeConsole::default().with_app("app-1", "FAQ Bot", AppMode::Workflow, &dsl));

    let run = ExportCoordinator::new(
        options(dir.path()).with_normalization(normalization()),
        backends(console, Some(vec![])),
    )
    .execute_export()
    .await
    .unwrap();

    assert!(!run.normalization_enabled);
    assert!(dir.path().join("faq-bot.yml").exists());
    assert!(!dir.path().join("faq-bot.normalized.yml").exists());
}

#[tokio::test]
async fn test_dataset_load_failure_aborts_run() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("dsl");
    let console = Arc::new(FakeConsole::default().with_app(
        "app-1",
        "FAQ Bot",
        AppMode::Workflow,
        &workflow_dsl(),
    ));

    let result = ExportCoordinator::new(
        options(&output).with_normalization(normalization()),
        backends(console.clone(), None),
    )
    .execute_export()
    .await;

    assert!(matches!(result, Err(ExporterError::Authentication(_))));
    assert!(console.export_calls().is_empty());
    assert!(!output.exists());
}

#[tokio::test]
async fn test_session_failure_aborts_run() {
    let dir = TempDir::new().unwrap();
    let console =
        Arc::new(FakeConsole::default().with_app("app-1", "First", AppMode::Chat, "a: 1\n"));
    let backends = ExportBackends {
        sessions: Arc::new(FakeSessions { fail: true }),
        ..backends(console.clone(), None)
    };

    let result = ExportCoordinator::new(options(dir.path()), backends)
        .execute_export()
        .await;

    assert!(matches!(result, Err(ExporterError::Authentication(_))));
    assert!(console.export_calls().is_empty());
}

#[tokio::test]
async fn test_invalid_base_url_aborts_before_login() {
    let dir = TempDir::new().unwrap();
    let console = Arc::new(FakeConsole::default());
    let options = ExportOptions::new("ftp://dify.example.com", dir.path());

    let result = ExportCoordinator::new(options, backends(console, None))
        .execute_export()
        .await;

    assert!(matches!(result, Err(ExporterError::Configuration(_))));
}

#[tokio::test]
async fn test_filename_collision_gets_hash_suffix() {
    let dir = TempDir::new().unwrap();
    let console = Arc::new(
        FakeConsole::default()
            .with_app("app-1", "Support", AppMode::Chat, "first: 1\n")
            .with_app("app-2", "support", AppMode::Chat, "second: 2\n"),
    );

    let run = ExportCoordinator::new(options(dir.path()), backends(console, None))
        .execute_export()
        .await
        .unwrap();

    let digest = format!("{:x}", Sha256::digest("app-2".as_bytes()));
    let second = format!("support-{}.yml", &digest[..8]);

    assert_eq!(run.results[0].filename, "support.yml");
    assert_eq!(run.results[1].filename, second);
    assert_eq!(read(dir.path().join("support.yml")), "first: 1\n");
    assert_eq!(read(dir.path().join(&second)), "second: 2\n");
}

#[tokio::test]
async fn test_run_report_serializes_results() {
    let dir = TempDir::new().unwrap();
    let console = Arc::new(
        FakeConsole::default()
            .with_app("app-1", "First", AppMode::Chat, "a: 1\n")
            .with_app("app-2", "Second", AppMode::Chat, "b: 2\n")
            .failing("app-2"),
    );

    let run = ExportCoordinator::new(options(&dir.path().join("dsl")), backends(console, None))
        .execute_export()
        .await
        .unwrap();

    let report_path = dir.path().join("reports").join("run.json");
    run.write_report(&report_path).await.unwrap();

    let report: serde_json::Value = serde_json::from_str(&read(&report_path)).unwrap();
    assert_eq!(report["results"][0]["appId"], "app-1");
    assert_eq!(report["results"][0]["success"], true);
    assert_eq!(report["results"][1]["success"], false);
    assert!(report["results"][1]["error"].is_string());
    assert!(report["durationMs"].is_number());
}
