//! Console adapter
//!
//! Session acquisition and the REST client for the console API.

pub mod client;
pub mod models;
pub mod session;

pub use client::{ConsoleApi, ConsoleClient, ConsoleConnector, HttpConsoleConnector};
pub use session::{Credentials, PasswordSessionProvider, Session, SessionProvider};
