//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use robot_common::AppError;
use robot_core::DomainError;
use thiserror::Error;

/// Service layer error type
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Domain rule violation or platform failure
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Application error (configuration, telemetry)
    #[error(transparent)]
    App(#[from] AppError),

    /// The author of a command lacks the role it requires
    #[error("Missing required role: {role}")]
    PermissionDenied { role: String },

    /// Malformed command or missing setting
    #[error("Validation error: {0}")]
    Validation(String),
}

impl ServiceError {
    /// Create a permission denied error
    pub fn permission_denied(role: impl Into<String>) -> Self {
        Self::PermissionDenied { role: role.into() }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Get the error code for logs
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.code(),
            Self::PermissionDenied { .. } => "PERMISSION_DENIED",
            Self::Validation(_) => "VALIDATION_ERROR",
        }
    }

    /// A name in the settings does not resolve against the guild
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Domain(e) if e.is_configuration())
    }

    /// The platform refused a write
    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::Domain(e) if e.is_mutation())
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
