//! Invite entity and invite-use tracking
//!
//! The platform does not say which invite a new member used. The bot keeps a
//! snapshot of every invite's use counter and, on join, looks for the invite
//! whose counter went up.

use std::collections::HashMap;

use crate::value_objects::Snowflake;

/// Invite entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invite {
    pub code: String,
    pub guild_id: Snowflake,
    pub channel_id: Snowflake,
    pub channel_name: Option<String>,
    pub uses: u64,
    pub max_uses: Option<u64>,
}

impl Invite {
    /// Create a new Invite
    pub fn new(code: impl Into<String>, guild_id: Snowflake, channel_id: Snowflake) -> Self {
        Self {
            code: code.into(),
            guild_id,
            channel_id,
            channel_name: None,
            uses: 0,
            max_uses: None,
        }
    }

    #[must_use]
    pub fn with_channel_name(mut self, name: impl Into<String>) -> Self {
        self.channel_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_uses(mut self, uses: u64) -> Self {
        self.uses = uses;
        self
    }

    /// Check if invite has reached max uses
    pub fn is_exhausted(&self) -> bool {
        self.max_uses.is_some_and(|max| max > 0 && self.uses >= max)
    }
}

/// Use counters keyed by invite code
pub type InviteUses = HashMap<String, u64>;

/// Capture the current use counter of every invite
pub fn snapshot_invite_uses(invites: &[Invite]) -> InviteUses {
    invites
        .iter()
        .map(|invite| (invite.code.clone(), invite.uses))
        .collect()
}

/// Find the invite whose use counter increased since `before` was taken
///
/// An invite missing from `before` counts as used when it has any uses.
/// Single-use invites that were consumed disappear from the list entirely and
/// cannot be detected.
pub fn find_used_invite<'a>(before: &InviteUses, after: &'a [Invite]) -> Option<&'a Invite> {
    after.iter().find(|invite| {
        let previous = before.get(&invite.code).copied().unwrap_or(0);
        invite.uses > previous
    })
}
