//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Configuration Errors (something referenced by name is missing)
    // =========================================================================
    #[error("Could not find the role {0}")]
    RoleNotFound(String),

    #[error("Could not find the channel {0}")]
    ChannelNotFound(String),

    #[error("Could not find the category {0}")]
    CategoryNotFound(String),

    #[error("Unknown permission name: {0}")]
    UnknownPermission(String),

    // =========================================================================
    // Not Found Errors (platform objects by id)
    // =========================================================================
    #[error("Guild not found: {0}")]
    GuildNotFound(Snowflake),

    #[error("Member not found in guild: {0}")]
    MemberNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    // =========================================================================
    // Platform Errors
    // =========================================================================
    /// The platform rejected a write (missing permission, role hierarchy, ...)
    #[error("Platform rejected {action}: {reason}")]
    MutationRejected { action: &'static str, reason: String },

    /// A read or the transport failed
    #[error("Platform error: {0}")]
    PlatformError(String),

    // =========================================================================
    // Hardware Errors
    // =========================================================================
    #[error("Relay error: {0}")]
    RelayError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Create a mutation error
    pub fn mutation(action: &'static str, reason: impl Into<String>) -> Self {
        Self::MutationRejected {
            action,
            reason: reason.into(),
        }
    }

    /// Get an error code string for logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::RoleNotFound(_) => "UNKNOWN_ROLE",
            Self::ChannelNotFound(_) => "UNKNOWN_CHANNEL",
            Self::CategoryNotFound(_) => "UNKNOWN_CATEGORY",
            Self::UnknownPermission(_) => "UNKNOWN_PERMISSION",
            Self::GuildNotFound(_) => "UNKNOWN_GUILD",
            Self::MemberNotFound(_) => "UNKNOWN_MEMBER",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::MutationRejected { .. } => "MUTATION_REJECTED",
            Self::PlatformError(_) => "PLATFORM_ERROR",
            Self::RelayError(_) => "RELAY_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// A role, channel, category or permission named in the configuration is missing
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::RoleNotFound(_)
                | Self::ChannelNotFound(_)
                | Self::CategoryNotFound(_)
                | Self::UnknownPermission(_)
        )
    }

    /// The platform refused a role or channel write
    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::MutationRejected { .. })
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::GuildNotFound(_) | Self::MemberNotFound(_))
    }
}
