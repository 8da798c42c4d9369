//! Guild role list - the rank-ordered set of roles defined in a guild

use crate::entities::{GuildMember, Role};
use crate::value_objects::Snowflake;

/// The full role list of a guild, kept in rank order (lowest first)
///
/// The order is the platform's display order, which is the only seniority
/// signal the badge ladder relies on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildRoles {
    guild_id: Snowflake,
    roles: Vec<Role>,
}

impl GuildRoles {
    /// Build from an unordered role list
    pub fn new(guild_id: Snowflake, mut roles: Vec<Role>) -> Self {
        roles.sort_by(Role::rank_cmp);
        Self { guild_id, roles }
    }

    #[inline]
    pub fn guild_id(&self) -> Snowflake {
        self.guild_id
    }

    /// Iterate roles from the lowest ranked to the highest ranked
    pub fn iter(&self) -> std::slice::Iter<'_, Role> {
        self.roles.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Find a role by id
    pub fn get(&self, id: Snowflake) -> Option<&Role> {
        self.roles.iter().find(|role| role.id == id)
    }

    /// Find the lowest ranked role with exactly this name
    pub fn find_by_name(&self, name: &str) -> Option<&Role> {
        self.roles.iter().find(|role| role.name == name)
    }

    /// Find the lowest ranked role whose name starts with `prefix`, skipping `ignored`
    pub fn first_with_prefix(&self, prefix: &str, ignored: Option<Snowflake>) -> Option<&Role> {
        self.roles
            .iter()
            .find(|role| role.has_prefix(prefix) && Some(role.id) != ignored)
    }

    /// The @everyone role
    pub fn default_role(&self) -> Option<&Role> {
        self.roles.iter().find(|role| role.is_everyone)
    }

    /// Resolve a member's role ids, lowest ranked first
    ///
    /// Ids that do not belong to this guild are skipped.
    pub fn member_roles(&self, member: &GuildMember) -> Vec<&Role> {
        self.roles
            .iter()
            .filter(|role| !role.is_everyone && member.has_role(role.id))
            .collect()
    }
}
