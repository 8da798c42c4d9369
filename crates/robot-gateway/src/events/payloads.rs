//! Wire models for gateway events and REST responses
//!
//! These mirror the platform's JSON objects and are converted into domain
//! entities at the edge. Fields the bot never reads are left out.

use chrono::{DateTime, Utc};
use robot_core::{
    Channel, ChannelType, GuildMember, Invite, Message, MessageAuthor, PermissionOverwrite,
    Permissions, Role, Snowflake,
};
use serde::Deserialize;

/// User object
#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub id: Snowflake,
    pub username: String,
    #[serde(default)]
    pub bot: bool,
}

/// READY event payload
#[derive(Debug, Clone, Deserialize)]
pub struct ReadyEvent {
    pub user: UserPayload,
    pub session_id: String,
}

/// GUILD_CREATE event payload (only the id is read, the rest is fetched over REST)
#[derive(Debug, Clone, Deserialize)]
pub struct GuildCreateEvent {
    pub id: Snowflake,
    #[serde(default)]
    pub unavailable: bool,
}

/// Guild member object, also the GUILD_MEMBER_ADD / GUILD_MEMBER_UPDATE payload
#[derive(Debug, Clone, Deserialize)]
pub struct MemberPayload {
    /// Present in gateway events, absent in REST member lists
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    pub user: UserPayload,
    #[serde(default)]
    pub nick: Option<String>,
    #[serde(default)]
    pub roles: Vec<Snowflake>,
    #[serde(default)]
    pub joined_at: Option<DateTime<Utc>>,
}

impl MemberPayload {
    pub fn into_member(self, guild_id: Snowflake) -> GuildMember {
        GuildMember {
            guild_id: self.guild_id.unwrap_or(guild_id),
            user_id: self.user.id,
            username: self.user.username,
            nickname: self.nick,
            bot: self.user.bot,
            role_ids: self.roles,
            joined_at: self.joined_at,
        }
    }
}

/// Partial member attached to MESSAGE_CREATE
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialMemberPayload {
    #[serde(default)]
    pub roles: Vec<Snowflake>,
}

/// MESSAGE_CREATE event payload
#[derive(Debug, Clone, Deserialize)]
pub struct MessagePayload {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    pub author: UserPayload,
    #[serde(default)]
    pub member: Option<PartialMemberPayload>,
    #[serde(default)]
    pub content: String,
}

impl From<MessagePayload> for Message {
    fn from(payload: MessagePayload) -> Self {
        Self {
            id: payload.id,
            channel_id: payload.channel_id,
            guild_id: payload.guild_id,
            author: MessageAuthor {
                id: payload.author.id,
                username: payload.author.username,
                bot: payload.author.bot,
                role_ids: payload.member.unwrap_or_default().roles,
            },
            content: payload.content,
        }
    }
}

/// Role object
#[derive(Debug, Clone, Deserialize)]
pub struct RolePayload {
    pub id: Snowflake,
    pub name: String,
    pub position: i32,
    #[serde(default)]
    pub permissions: Permissions,
    #[serde(default)]
    pub managed: bool,
}

impl RolePayload {
    pub fn into_role(self, guild_id: Snowflake) -> Role {
        Role {
            id: self.id,
            guild_id,
            name: self.name,
            position: self.position,
            permissions: self.permissions,
            managed: self.managed,
            // The default role shares its id with the guild
            is_everyone: self.id == guild_id,
        }
    }
}

/// Channel object
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelPayload {
    pub id: Snowflake,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub parent_id: Option<Snowflake>,
    #[serde(default)]
    pub permission_overwrites: Vec<PermissionOverwrite>,
}

impl From<ChannelPayload> for Channel {
    fn from(payload: ChannelPayload) -> Self {
        Self {
            id: payload.id,
            guild_id: payload.guild_id,
            name: payload.name,
            channel_type: ChannelType::from(payload.kind),
            topic: payload.topic,
            position: payload.position,
            parent_id: payload.parent_id,
            permission_overwrites: payload.permission_overwrites,
        }
    }
}

/// Channel stub embedded in an invite
#[derive(Debug, Clone, Deserialize)]
pub struct InviteChannelPayload {
    pub id: Snowflake,
    #[serde(default)]
    pub name: Option<String>,
}

/// Invite object with metadata
#[derive(Debug, Clone, Deserialize)]
pub struct InvitePayload {
    pub code: String,
    #[serde(default)]
    pub channel: Option<InviteChannelPayload>,
    #[serde(default)]
    pub uses: u64,
    #[serde(default)]
    pub max_uses: u64,
}

impl InvitePayload {
    pub fn into_invite(self, guild_id: Snowflake) -> Invite {
        let (channel_id, channel_name) = match self.channel {
            Some(channel) => (channel.id, channel.name),
            None => (Snowflake::default(), None),
        };
        Invite {
            code: self.code,
            guild_id,
            channel_id,
            channel_name,
            uses: self.uses,
            // Zero means unlimited
            max_uses: (self.max_uses > 0).then_some(self.max_uses),
        }
    }
}
