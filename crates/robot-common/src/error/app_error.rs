//! Application error types
//!
//! Errors that end the process. Everything that happens while handling a
//! single event is reported and swallowed by the dispatcher instead.

use robot_core::DomainError;

use crate::config::ConfigError;
use crate::telemetry::TracingError;

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Startup and shutdown errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Tracing error: {0}")]
    Tracing(#[from] TracingError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Get an error code string for logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Domain(e) => e.code(),
            Self::Tracing(_) => "TRACING_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
