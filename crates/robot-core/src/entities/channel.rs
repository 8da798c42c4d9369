//! Channel entity - represents a guild text channel or category

use serde::{Deserialize, Serialize};

use crate::value_objects::{Permissions, Snowflake};

/// Channel type enum (wire values)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum ChannelType {
    /// Guild text channel
    #[default]
    GuildText = 0,
    /// Direct message between users
    Dm = 1,
    /// Guild voice channel
    GuildVoice = 2,
    /// Guild category for organizing channels
    GuildCategory = 4,
    /// Anything the bot does not model
    Other = 255,
}

impl ChannelType {
    #[inline]
    #[must_use]
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl From<u8> for ChannelType {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::GuildText,
            1 => Self::Dm,
            2 => Self::GuildVoice,
            4 => Self::GuildCategory,
            _ => Self::Other,
        }
    }
}

/// Whether an overwrite targets a role or a single member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum OverwriteKind {
    Role,
    Member,
}

impl From<OverwriteKind> for u8 {
    fn from(kind: OverwriteKind) -> Self {
        match kind {
            OverwriteKind::Role => 0,
            OverwriteKind::Member => 1,
        }
    }
}

impl TryFrom<u8> for OverwriteKind {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Role),
            1 => Ok(Self::Member),
            other => Err(format!("invalid overwrite type: {other}")),
        }
    }
}

/// Channel-level permission overwrite for one role or member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionOverwrite {
    pub id: Snowflake,
    #[serde(rename = "type")]
    pub kind: OverwriteKind,
    #[serde(default)]
    pub allow: Permissions,
    #[serde(default)]
    pub deny: Permissions,
}

impl PermissionOverwrite {
    /// Empty overwrite for a role
    pub fn role(id: Snowflake) -> Self {
        Self {
            id,
            kind: OverwriteKind::Role,
            allow: Permissions::empty(),
            deny: Permissions::empty(),
        }
    }

    /// Explicitly allow permissions (clears any matching deny bits)
    pub fn grant(&mut self, permissions: Permissions) {
        self.allow |= permissions;
        self.deny &= !permissions;
    }

    /// Explicitly deny permissions (clears any matching allow bits)
    pub fn revoke(&mut self, permissions: Permissions) {
        self.deny |= permissions;
        self.allow &= !permissions;
    }
}

/// Channel entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: Snowflake,
    pub guild_id: Option<Snowflake>,
    pub name: Option<String>,
    pub channel_type: ChannelType,
    pub topic: Option<String>,
    pub position: i32,
    pub parent_id: Option<Snowflake>,
    pub permission_overwrites: Vec<PermissionOverwrite>,
}

impl Channel {
    /// Create a new guild text channel
    #[must_use]
    pub fn new_text(id: Snowflake, guild_id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            id,
            guild_id: Some(guild_id),
            name: Some(name.into()),
            channel_type: ChannelType::GuildText,
            topic: None,
            position: 0,
            parent_id: None,
            permission_overwrites: Vec::new(),
        }
    }

    /// Create a new category channel
    #[must_use]
    pub fn new_category(id: Snowflake, guild_id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            channel_type: ChannelType::GuildCategory,
            ..Self::new_text(id, guild_id, name)
        }
    }

    #[inline]
    #[must_use]
    pub fn is_category(&self) -> bool {
        self.channel_type == ChannelType::GuildCategory
    }

    #[inline]
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.channel_type == ChannelType::GuildText
    }

    /// Check the channel name, treating unnamed channels as never matching
    #[inline]
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }

    #[inline]
    #[must_use]
    pub fn name_or_id(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id.to_string())
    }
}
