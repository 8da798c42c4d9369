//! Platform events - what the gateway delivers to the bot
//!
//! Only the events the bot reacts to are modelled; everything else is dropped
//! by the gateway decoder.

use crate::entities::{GuildMember, Message};
use crate::value_objects::Snowflake;

/// Events the dispatcher handles
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformEvent {
    /// Session established
    Ready { user_id: Snowflake, username: String },
    /// Guild data is available (initial connect or outage recovery)
    GuildAvailable { guild_id: Snowflake },
    /// A user joined a guild
    MemberJoin(GuildMember),
    /// A member changed (roles, nickname); carries the new state
    MemberUpdate(GuildMember),
    /// A message was posted
    MessageCreate(Message),
}

impl PlatformEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Ready { .. } => "READY",
            Self::GuildAvailable { .. } => "GUILD_AVAILABLE",
            Self::MemberJoin(_) => "MEMBER_JOIN",
            Self::MemberUpdate(_) => "MEMBER_UPDATE",
            Self::MessageCreate(_) => "MESSAGE_CREATE",
        }
    }

    /// Get the guild this event belongs to (if any)
    pub fn guild_id(&self) -> Option<Snowflake> {
        match self {
            Self::Ready { .. } => None,
            Self::GuildAvailable { guild_id } => Some(*guild_id),
            Self::MemberJoin(member) | Self::MemberUpdate(member) => Some(member.guild_id),
            Self::MessageCreate(message) => message.guild_id,
        }
    }
}
