//! Platform ports - define the interface to the chat platform and the relay
//!
//! The domain layer defines what it needs; the gateway crate provides the
//! REST and GPIO implementations, tests provide in-memory ones.

use std::time::Duration;

use async_trait::async_trait;

use crate::entities::{Channel, GuildMember, Invite, PermissionOverwrite, Role};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for platform operations
pub type PlatformResult<T> = Result<T, DomainError>;

/// A text channel or category to create
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewChannel {
    pub name: String,
    pub topic: Option<String>,
    pub category: bool,
    pub parent_id: Option<Snowflake>,
    pub permission_overwrites: Vec<PermissionOverwrite>,
}

/// Changes to an existing channel
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChannelEdit {
    pub topic: Option<String>,
    pub permission_overwrites: Vec<PermissionOverwrite>,
}

// ============================================================================
// Guild Platform
// ============================================================================

#[async_trait]
pub trait GuildPlatform: Send + Sync {
    /// List all roles in a guild (any order)
    async fn guild_roles(&self, guild_id: Snowflake) -> PlatformResult<Vec<Role>>;

    /// List all members of a guild
    async fn guild_members(&self, guild_id: Snowflake) -> PlatformResult<Vec<GuildMember>>;

    /// List all channels and categories of a guild
    async fn guild_channels(&self, guild_id: Snowflake) -> PlatformResult<Vec<Channel>>;

    /// List all invites of a guild with their use counters
    async fn guild_invites(&self, guild_id: Snowflake) -> PlatformResult<Vec<Invite>>;

    /// Give a member a role
    async fn add_member_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> PlatformResult<()>;

    /// Take a set of roles from a member
    async fn remove_member_roles(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_ids: &[Snowflake],
    ) -> PlatformResult<()>;

    /// Post a message in a channel
    async fn send_message(&self, channel_id: Snowflake, content: &str) -> PlatformResult<()>;

    /// Create a role (placed just above @everyone)
    async fn create_role(&self, guild_id: Snowflake, name: &str) -> PlatformResult<Role>;

    /// Move a role to a position
    async fn move_role(
        &self,
        guild_id: Snowflake,
        role_id: Snowflake,
        position: i32,
    ) -> PlatformResult<()>;

    /// Create a text channel or category
    async fn create_channel(
        &self,
        guild_id: Snowflake,
        channel: &NewChannel,
    ) -> PlatformResult<Channel>;

    /// Update topic and overwrites of a channel
    async fn edit_channel(&self, channel_id: Snowflake, edit: &ChannelEdit)
        -> PlatformResult<Channel>;

    /// Move a channel or category to a position
    async fn move_channel(
        &self,
        guild_id: Snowflake,
        channel_id: Snowflake,
        position: i32,
    ) -> PlatformResult<()>;
}

// ============================================================================
// Relay
// ============================================================================

#[async_trait]
pub trait Relay: Send + Sync {
    /// Switch the output on, hold it for `duration`, switch it off
    async fn pulse(&self, pin: u8, duration: Duration) -> Result<(), DomainError>;
}
