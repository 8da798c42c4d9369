//! Permission bitflags as used by channel permission overwrites
//!
//! Bit positions match the platform's wire values, so the bitfield can be sent
//! unchanged in REST payloads.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

bitflags! {
    /// Platform permission flags
    ///
    /// Serialized as a decimal string, the way the platform transmits them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Permissions: u64 {
        const CREATE_INSTANT_INVITE     = 1 << 0;
        const KICK_MEMBERS              = 1 << 1;
        const BAN_MEMBERS               = 1 << 2;
        /// Bypass all permission checks
        const ADMINISTRATOR             = 1 << 3;
        const MANAGE_CHANNELS           = 1 << 4;
        const MANAGE_GUILD              = 1 << 5;
        const ADD_REACTIONS             = 1 << 6;
        const VIEW_AUDIT_LOG            = 1 << 7;
        const PRIORITY_SPEAKER          = 1 << 8;
        const STREAM                    = 1 << 9;
        /// View channel and read messages
        const VIEW_CHANNEL              = 1 << 10;
        const SEND_MESSAGES             = 1 << 11;
        const SEND_TTS_MESSAGES         = 1 << 12;
        const MANAGE_MESSAGES           = 1 << 13;
        const EMBED_LINKS               = 1 << 14;
        const ATTACH_FILES              = 1 << 15;
        const READ_MESSAGE_HISTORY      = 1 << 16;
        const MENTION_EVERYONE          = 1 << 17;
        const USE_EXTERNAL_EMOJIS       = 1 << 18;
        const CONNECT                   = 1 << 20;
        const SPEAK                     = 1 << 21;
        const MANAGE_NICKNAMES          = 1 << 27;
        /// Create, edit, delete, assign roles (also edits channel overwrites)
        const MANAGE_ROLES              = 1 << 28;
        const MANAGE_WEBHOOKS           = 1 << 29;
        const USE_APPLICATION_COMMANDS  = 1 << 31;
        const MANAGE_THREADS            = 1 << 34;
        const CREATE_PUBLIC_THREADS     = 1 << 35;
        const CREATE_PRIVATE_THREADS    = 1 << 36;
        const SEND_MESSAGES_IN_THREADS  = 1 << 38;
    }
}

impl Permissions {
    /// Look up a single permission by its attribute name (`send_messages`)
    ///
    /// Matching is case-insensitive. The legacy aliases `read_messages` and
    /// `manage_permissions` are accepted as well.
    pub fn from_attribute_name(name: &str) -> Option<Self> {
        let flag = match name.trim().to_ascii_lowercase().as_str() {
            "create_instant_invite" => Self::CREATE_INSTANT_INVITE,
            "kick_members" => Self::KICK_MEMBERS,
            "ban_members" => Self::BAN_MEMBERS,
            "administrator" => Self::ADMINISTRATOR,
            "manage_channels" => Self::MANAGE_CHANNELS,
            "manage_guild" => Self::MANAGE_GUILD,
            "add_reactions" => Self::ADD_REACTIONS,
            "view_audit_log" => Self::VIEW_AUDIT_LOG,
            "priority_speaker" => Self::PRIORITY_SPEAKER,
            "stream" => Self::STREAM,
            "view_channel" | "read_messages" => Self::VIEW_CHANNEL,
            "send_messages" => Self::SEND_MESSAGES,
            "send_tts_messages" => Self::SEND_TTS_MESSAGES,
            "manage_messages" => Self::MANAGE_MESSAGES,
            "embed_links" => Self::EMBED_LINKS,
            "attach_files" => Self::ATTACH_FILES,
            "read_message_history" => Self::READ_MESSAGE_HISTORY,
            "mention_everyone" => Self::MENTION_EVERYONE,
            "use_external_emojis" => Self::USE_EXTERNAL_EMOJIS,
            "connect" => Self::CONNECT,
            "speak" => Self::SPEAK,
            "manage_nicknames" => Self::MANAGE_NICKNAMES,
            "manage_roles" | "manage_permissions" => Self::MANAGE_ROLES,
            "manage_webhooks" => Self::MANAGE_WEBHOOKS,
            "use_application_commands" => Self::USE_APPLICATION_COMMANDS,
            "manage_threads" => Self::MANAGE_THREADS,
            "create_public_threads" => Self::CREATE_PUBLIC_THREADS,
            "create_private_threads" => Self::CREATE_PRIVATE_THREADS,
            "send_messages_in_threads" => Self::SEND_MESSAGES_IN_THREADS,
            _ => return None,
        };
        Some(flag)
    }

    /// Parse a list of attribute names into one permission set
    ///
    /// Returns the first unknown name as the error.
    pub fn from_names<I, S>(names: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().try_fold(Permissions::empty(), |acc, name| {
            Self::from_attribute_name(name.as_ref())
                .map(|flag| acc | flag)
                .ok_or_else(|| name.as_ref().to_string())
        })
    }

    /// Parse from string representation (decimal number)
    pub fn parse(s: &str) -> Result<Self, std::num::ParseIntError> {
        s.parse::<u64>().map(Permissions::from_bits_truncate)
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Permissions::empty()
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

impl Serialize for Permissions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.bits().to_string())
    }
}

// Deserialize from string or number
impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct PermissionsVisitor;

        impl Visitor<'_> for PermissionsVisitor {
            type Value = Permissions;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer representing permission bits")
            }

            fn visit_i64<E>(self, value: i64) -> Result<Permissions, E>
            where
                E: de::Error,
            {
                Ok(Permissions::from_bits_truncate(value as u64))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Permissions, E>
            where
                E: de::Error,
            {
                Ok(Permissions::from_bits_truncate(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Permissions, E>
            where
                E: de::Error,
            {
                value
                    .parse::<u64>()
                    .map(Permissions::from_bits_truncate)
                    .map_err(|_| de::Error::custom("invalid permissions string"))
            }
        }

        deserializer.deserialize_any(PermissionsVisitor)
    }
}

impl From<u64> for Permissions {
    fn from(bits: u64) -> Self {
        Permissions::from_bits_truncate(bits)
    }
}
