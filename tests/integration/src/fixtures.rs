//! Test fixtures: settings, a populated guild and message builders

use robot_core::{Channel, GuildMember, Message, MessageAuthor, Snowflake};

use crate::helpers::InMemoryGuild;

pub const GUILD_ID: Snowflake = Snowflake::new(1000);

pub const SETTINGS_JSON: &str = r#"{
    "discord_token": "integration-token",
    "guild_id": 1000,
    "year_role_prefix": "Year",
    "badge_role_prefix": "Badge",
    "badge_role_suffix": "Y",
    "status_channel_name": "bot-status",
    "admin_role": "Admin",
    "command_prefix": "!",
    "doorbell": {"channel": "doorbell", "pin": 17, "allowed_user_role": "Member"},
    "invites": [
        {"channel": "team-a", "role": "Team A"},
        {"channel": "team-b", "role": "Team B"}
    ],
    "edition": {
        "category_prefix": "Edition",
        "category_permissions": [
            {"role": "@everyone", "remove": ["view_channel"]},
            {"role": "Year", "add": ["view_channel"]}
        ],
        "channels": [
            {"name": "general", "topic": "Everything", "permissions": []},
            {"name": "announcements", "topic": "News", "permissions": [
                {"role": "Year", "remove": ["send_messages"]},
                {"role": "Organizer", "add": ["send_messages", "manage_messages"]}
            ]}
        ]
    }
}"#;

pub const RESPONSES_JSON: &str =
    r#"{"ok": "The door is open.", "invalidRole": "Only members can ring."}"#;

/// Channels of the standard guild
pub struct Channels {
    pub status: Channel,
    pub doorbell: Channel,
    pub team_a: Channel,
    pub team_b: Channel,
}

/// A guild with two year roles, a two-rung badge ladder and the configured channels
///
/// "Team B" is deliberately missing so its invite rule fails.
pub fn standard_guild() -> (InMemoryGuild, Channels) {
    let guild = InMemoryGuild::new(GUILD_ID);
    for name in [
        "Year 2022",
        "Year 2023",
        "Badge 1Y",
        "Badge 2Y",
        "Team A",
        "Member",
        "Organizer",
        "Admin",
    ] {
        guild.role(name);
    }
    let channels = Channels {
        status: guild.text_channel("bot-status"),
        doorbell: guild.text_channel("doorbell"),
        team_a: guild.text_channel("team-a"),
        team_b: guild.text_channel("team-b"),
    };
    (guild, channels)
}

/// A message posted by a member
pub fn message_from(member: &GuildMember, channel: &Channel, content: &str) -> Message {
    Message {
        id: Snowflake::new(90_000),
        channel_id: channel.id,
        guild_id: Some(member.guild_id),
        author: MessageAuthor {
            id: member.user_id,
            username: member.username.clone(),
            bot: member.bot,
            role_ids: member.role_ids.clone(),
        },
        content: content.to_string(),
    }
}
