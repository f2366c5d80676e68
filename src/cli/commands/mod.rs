//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod export;
pub mod init;
pub mod restore;
pub mod validate;

use crate::domain::ExporterError;

/// Exit code for a successful command
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code when the run completed but some applications failed
pub const EXIT_PARTIAL: i32 = 1;
/// Exit code for configuration errors
pub const EXIT_CONFIG: i32 = 2;
/// Exit code for authentication and connection errors
pub const EXIT_CONNECTION: i32 = 4;
/// Exit code for any other fatal error
pub const EXIT_FATAL: i32 = 5;

/// Map an error that aborted a command to its exit code
pub fn exit_code_for(error: &ExporterError) -> i32 {
    match error {
        ExporterError::Configuration(_) | ExporterError::Validation(_) => EXIT_CONFIG,
        ExporterError::Authentication(_) | ExporterError::Transport(_) => EXIT_CONNECTION,
        _ => EXIT_FATAL,
    }
}
