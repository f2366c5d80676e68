//! External system integrations.
//!
//! - [`console`] - Session acquisition and the console REST API
//! - [`knowledge`] - Dataset listing through the knowledge API
//!
//! # Design Pattern
//!
//! Each collaborator sits behind a trait ([`console::SessionProvider`],
//! [`console::ConsoleApi`], [`knowledge::DatasetSource`]) so the export
//! coordinator can run against in-memory implementations in tests. Clients
//! are built by connector traits because they need run-time inputs (the
//! session, the knowledge API key).
//!
//! ```rust,no_run
//! use dsl_exporter::adapters::console::{
//!     ConsoleApi, ConsoleConnector, Credentials, HttpConsoleConnector, PasswordSessionProvider,
//!     SessionProvider,
//! };
//! use dsl_exporter::config::secret_string;
//!
//! # async fn example() -> dsl_exporter::domain::Result<()> {
//! let base_url = "https://dify.example.com";
//! let credentials = Credentials::new("admin@example.com", secret_string("pass".to_string()));
//!
//! let session = PasswordSessionProvider::new(60, true)
//!     .acquire(base_url, Some(&credentials), true)
//!     .await?;
//! let console = HttpConsoleConnector::new(60, true).connect(base_url, session)?;
//!
//! for app in console.list_applications().await? {
//!     println!("{} ({})", app.name, app.mode);
//! }
//! # Ok(())
//! # }
//! ```

pub mod console;
pub mod http;
pub mod knowledge;
