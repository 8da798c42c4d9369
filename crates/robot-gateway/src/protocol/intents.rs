//! Gateway intents
//!
//! Intents select which event groups the platform delivers to the session.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Intents: u64 {
        const GUILDS = 1 << 0;
        /// Privileged
        const GUILD_MEMBERS = 1 << 1;
        const GUILD_MODERATION = 1 << 2;
        const GUILD_INVITES = 1 << 6;
        const GUILD_PRESENCES = 1 << 8;
        const GUILD_MESSAGES = 1 << 9;
        const DIRECT_MESSAGES = 1 << 12;
        /// Privileged
        const MESSAGE_CONTENT = 1 << 15;
    }
}

impl Intents {
    /// Everything the bot reacts to: members, invites and message text
    #[must_use]
    pub fn bot() -> Self {
        Self::GUILDS
            | Self::GUILD_MEMBERS
            | Self::GUILD_INVITES
            | Self::GUILD_MESSAGES
            | Self::MESSAGE_CONTENT
    }
}
