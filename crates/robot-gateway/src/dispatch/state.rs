//! Dispatch state
//!
//! What the dispatcher remembers between events: invite counters per guild
//! and the last known role ids per member.

use dashmap::DashMap;
use robot_core::{
    find_used_invite, snapshot_invite_uses, GuildMember, Invite, InviteUses, Snowflake,
};

/// Shared state across dispatched events
#[derive(Debug, Default)]
pub struct DispatchState {
    /// Invite code -> uses, per guild
    invite_uses: DashMap<Snowflake, InviteUses>,
    /// User id -> role ids as of the last event seen
    member_roles: DashMap<Snowflake, Vec<Snowflake>>,
}

impl DispatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a guild's invite snapshot
    pub fn store_invites(&self, guild_id: Snowflake, invites: &[Invite]) {
        self.invite_uses.insert(guild_id, snapshot_invite_uses(invites));
    }

    /// Find the invite that was used since the last snapshot and store the new counters
    ///
    /// Without an earlier snapshot there is nothing to compare against, so the
    /// counters are only stored.
    pub fn take_used_invite(&self, guild_id: Snowflake, invites: &[Invite]) -> Option<Invite> {
        let snapshot = snapshot_invite_uses(invites);
        let previous = self.invite_uses.insert(guild_id, snapshot)?;
        find_used_invite(&previous, invites).cloned()
    }

    /// The stored use count of an invite
    pub fn invite_uses(&self, guild_id: Snowflake, code: &str) -> Option<u64> {
        self.invite_uses
            .get(&guild_id)
            .and_then(|uses| uses.get(code).copied())
    }

    /// Remember the role ids of a set of members
    pub fn seed_members(&self, members: &[GuildMember]) {
        for member in members {
            self.member_roles.insert(member.user_id, member.role_ids.clone());
        }
    }

    /// Store a member's current role ids, returning the previous ones
    pub fn replace_member_roles(&self, member: &GuildMember) -> Option<Vec<Snowflake>> {
        self.member_roles.insert(member.user_id, member.role_ids.clone())
    }

    /// The cached role ids of a member
    pub fn member_roles(&self, user_id: Snowflake) -> Option<Vec<Snowflake>> {
        self.member_roles.get(&user_id).map(|roles| roles.clone())
    }

    pub fn cached_members(&self) -> usize {
        self.member_roles.len()
    }
}
