//! Message entity - a message posted in a guild channel

use crate::value_objects::Snowflake;

/// Author of a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageAuthor {
    pub id: Snowflake,
    pub username: String,
    pub bot: bool,
    /// Role ids of the author in the guild (empty outside guilds)
    pub role_ids: Vec<Snowflake>,
}

/// Message entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    pub guild_id: Option<Snowflake>,
    pub author: MessageAuthor,
    pub content: String,
}

impl Message {
    /// Check if the author holds a role
    #[inline]
    pub fn author_has_role(&self, role_id: Snowflake) -> bool {
        self.author.role_ids.contains(&role_id)
    }

    /// Split a prefixed command into its name and arguments
    ///
    /// `"!edition 2025"` with prefix `"!"` yields `("edition", ["2025"])`.
    pub fn command(&self, prefix: &str) -> Option<(&str, Vec<&str>)> {
        let body = self.content.trim().strip_prefix(prefix)?;
        let mut parts = body.split_whitespace();
        let name = parts.next()?;
        Some((name, parts.collect()))
    }
}
