//! Gateway event names the bot subscribes to

use std::fmt;
use std::str::FromStr;

/// Dispatch event names (the `t` field)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayEventType {
    Ready,
    Resumed,
    GuildCreate,
    GuildMemberAdd,
    GuildMemberUpdate,
    MessageCreate,
}

impl GatewayEventType {
    /// Get the string representation of the event type
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::Resumed => "RESUMED",
            Self::GuildCreate => "GUILD_CREATE",
            Self::GuildMemberAdd => "GUILD_MEMBER_ADD",
            Self::GuildMemberUpdate => "GUILD_MEMBER_UPDATE",
            Self::MessageCreate => "MESSAGE_CREATE",
        }
    }
}

impl FromStr for GatewayEventType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "READY" => Ok(Self::Ready),
            "RESUMED" => Ok(Self::Resumed),
            "GUILD_CREATE" => Ok(Self::GuildCreate),
            "GUILD_MEMBER_ADD" => Ok(Self::GuildMemberAdd),
            "GUILD_MEMBER_UPDATE" => Ok(Self::GuildMemberUpdate),
            "MESSAGE_CREATE" => Ok(Self::MessageCreate),
            _ => Err(()),
        }
    }
}

impl fmt::Display for GatewayEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
