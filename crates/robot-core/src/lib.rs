//! # robot-core
//!
//! Domain layer containing entities, value objects, the seniority badge ladder,
//! platform ports, and platform events.
//! This crate has zero dependencies on infrastructure (websocket, HTTP, GPIO, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod seniority;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    find_used_invite, snapshot_invite_uses, Channel, ChannelType, GuildMember, GuildRoles, Invite,
    InviteUses, Message, MessageAuthor, OverwriteKind, PermissionOverwrite, Role,
};
pub use error::DomainError;
pub use events::PlatformEvent;
pub use seniority::{year_role_sequence, BadgeLadder, BadgePlan, RoleAffixes};
pub use traits::{ChannelEdit, GuildPlatform, NewChannel, PlatformResult, Relay};
pub use value_objects::{Permissions, Snowflake, SnowflakeParseError};
