//! Gateway events
//!
//! Decodes the dispatch events the bot reacts to into [`PlatformEvent`]s.

mod event_types;
mod payloads;

pub use event_types::GatewayEventType;
pub use payloads::{
    ChannelPayload, GuildCreateEvent, InviteChannelPayload, InvitePayload, MemberPayload,
    MessagePayload, PartialMemberPayload, ReadyEvent, RolePayload, UserPayload,
};

use robot_core::{PlatformEvent, Snowflake};
use serde_json::Value;

use crate::error::GatewayResult;

/// Decode a dispatch payload
///
/// Returns `Ok(None)` for events the bot does not handle. An unavailable
/// `GUILD_CREATE` (outage) is dropped too; the guild arrives again once it
/// recovers.
pub fn decode_dispatch(event_name: &str, data: Value) -> GatewayResult<Option<PlatformEvent>> {
    let Ok(event_type) = event_name.parse::<GatewayEventType>() else {
        return Ok(None);
    };

    let event = match event_type {
        GatewayEventType::Ready => {
            let ready: ReadyEvent = serde_json::from_value(data)?;
            Some(PlatformEvent::Ready {
                user_id: ready.user.id,
                username: ready.user.username,
            })
        }
        GatewayEventType::Resumed => None,
        GatewayEventType::GuildCreate => {
            let guild: GuildCreateEvent = serde_json::from_value(data)?;
            (!guild.unavailable).then_some(PlatformEvent::GuildAvailable { guild_id: guild.id })
        }
        GatewayEventType::GuildMemberAdd => Some(PlatformEvent::MemberJoin(decode_member(data)?)),
        GatewayEventType::GuildMemberUpdate => {
            Some(PlatformEvent::MemberUpdate(decode_member(data)?))
        }
        GatewayEventType::MessageCreate => {
            let message: MessagePayload = serde_json::from_value(data)?;
            Some(PlatformEvent::MessageCreate(message.into()))
        }
    };

    Ok(event)
}

fn decode_member(data: Value) -> GatewayResult<robot_core::GuildMember> {
    let payload: MemberPayload = serde_json::from_value(data)?;
    // Gateway member events always carry their guild
    Ok(payload.into_member(Snowflake::default()))
}
