//! Role entity - represents a guild role

use std::cmp::Ordering;

use crate::value_objects::{Permissions, Snowflake};

/// Role entity
///
/// Identity is the id; names are not guaranteed unique within a guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: Snowflake,
    pub guild_id: Snowflake,
    pub name: String,
    pub position: i32,
    pub permissions: Permissions,
    /// Owned by an integration (bots, boosts); cannot be assigned manually
    pub managed: bool,
    pub is_everyone: bool,
}

impl Role {
    /// Create a new Role
    pub fn new(id: Snowflake, guild_id: Snowflake, name: impl Into<String>, position: i32) -> Self {
        Self {
            id,
            guild_id,
            name: name.into(),
            position,
            permissions: Permissions::empty(),
            managed: false,
            is_everyone: false,
        }
    }

    /// Create the @everyone role for a guild (its id equals the guild id)
    pub fn everyone(guild_id: Snowflake) -> Self {
        Self {
            id: guild_id,
            guild_id,
            name: "@everyone".to_string(),
            position: 0,
            permissions: Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES,
            managed: false,
            is_everyone: true,
        }
    }

    /// Compare two roles by guild rank (`Less` means ranked lower)
    ///
    /// Equal positions are broken by id: the older role ranks higher.
    pub fn rank_cmp(&self, other: &Role) -> Ordering {
        self.position
            .cmp(&other.position)
            .then_with(|| other.id.cmp(&self.id))
    }

    #[inline]
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.name.starts_with(prefix)
    }
}
