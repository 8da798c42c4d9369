//! Badge ladder and reconciliation planning

use crate::entities::{GuildRoles, Role};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Name affixes identifying year roles and badge roles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAffixes {
    year_prefix: String,
    badge_prefix: String,
    badge_suffix: String,
}

impl RoleAffixes {
    /// Create the affix set
    ///
    /// An empty affix would match every role in the guild, so all three must
    /// be non-empty.
    pub fn new(
        year_prefix: impl Into<String>,
        badge_prefix: impl Into<String>,
        badge_suffix: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let affixes = Self {
            year_prefix: year_prefix.into(),
            badge_prefix: badge_prefix.into(),
            badge_suffix: badge_suffix.into(),
        };
        for (field, value) in [
            ("year_role_prefix", &affixes.year_prefix),
            ("badge_role_prefix", &affixes.badge_prefix),
            ("badge_role_suffix", &affixes.badge_suffix),
        ] {
            if value.is_empty() {
                return Err(DomainError::ValidationError(format!("{field} must not be empty")));
            }
        }
        Ok(affixes)
    }

    pub fn year_prefix(&self) -> &str {
        &self.year_prefix
    }

    pub fn badge_prefix(&self) -> &str {
        &self.badge_prefix
    }

    pub fn badge_suffix(&self) -> &str {
        &self.badge_suffix
    }

    /// One counted participation year
    #[inline]
    pub fn is_year_role(&self, role: &Role) -> bool {
        role.name.starts_with(&self.year_prefix)
    }

    /// Any role carrying the badge prefix, with or without the suffix
    #[inline]
    pub fn is_badge_role(&self, role: &Role) -> bool {
        role.name.starts_with(&self.badge_prefix)
    }

    /// A role that is a rung of the ladder (prefix and suffix)
    #[inline]
    pub fn is_ladder_rung(&self, role: &Role) -> bool {
        self.is_badge_role(role) && role.name.ends_with(&self.badge_suffix)
    }
}

/// The year roles a member holds, as an ordered id sequence
///
/// Used to detect year-role changes between two snapshots of the same member.
/// The comparison is order-sensitive on purpose: both snapshots come from the
/// same rank-ordered guild list.
pub fn year_role_sequence(member_roles: &[&Role], affixes: &RoleAffixes) -> Vec<Snowflake> {
    member_roles
        .iter()
        .filter(|role| affixes.is_year_role(role))
        .map(|role| role.id)
        .collect()
}

/// Rank-ordered badge roles of a guild
///
/// Index 0 is the "no badge" rung; index `i` is the `i`-th lowest ranked
/// badge role.
#[derive(Debug, Clone)]
pub struct BadgeLadder<'a> {
    rungs: Vec<&'a Role>,
}

impl<'a> BadgeLadder<'a> {
    /// Collect every guild role matching both badge affixes, lowest rank first
    pub fn from_guild(roles: &'a GuildRoles, affixes: &RoleAffixes) -> Self {
        Self {
            rungs: roles.iter().filter(|role| affixes.is_ladder_rung(role)).collect(),
        }
    }

    /// Number of real badge roles (the "no badge" rung is not counted)
    #[inline]
    pub fn len(&self) -> usize {
        self.rungs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rungs.is_empty()
    }

    /// Clamp a year count to the highest rung
    #[inline]
    pub fn target_index(&self, year_count: usize) -> usize {
        year_count.min(self.len())
    }

    /// The role at a rung, `None` for rung 0 or past the top
    pub fn rung(&self, index: usize) -> Option<&'a Role> {
        index
            .checked_sub(1)
            .and_then(|i| self.rungs.get(i))
            .copied()
    }

    /// The badge a member with `year_count` years should hold
    pub fn badge_for(&self, year_count: usize) -> Option<&'a Role> {
        self.rung(self.target_index(year_count))
    }

    /// Compute the role changes that leave the member with exactly the right badge
    ///
    /// `member_roles` are the roles the member currently holds.
    pub fn plan(&self, member_roles: &[&Role], affixes: &RoleAffixes) -> BadgePlan {
        let year_count = member_roles
            .iter()
            .filter(|role| affixes.is_year_role(role))
            .count();
        let target_index = self.target_index(year_count);
        let target = self.rung(target_index);

        let current_badges: Vec<&Role> = member_roles
            .iter()
            .copied()
            .filter(|role| affixes.is_badge_role(role))
            .collect();

        let add = target
            .filter(|target| !current_badges.iter().any(|held| held.id == target.id))
            .cloned();
        let remove = current_badges
            .into_iter()
            .filter(|held| target.is_none_or(|target| target.id != held.id))
            .cloned()
            .collect();

        BadgePlan {
            year_count,
            target_index,
            target: target.cloned(),
            add,
            remove,
        }
    }
}

/// Outcome of planning a badge reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgePlan {
    /// Year roles held by the member
    pub year_count: usize,
    /// Rung selected after clamping
    pub target_index: usize,
    /// Badge the member should end up with
    pub target: Option<Role>,
    /// Badge to add (only when not already held)
    pub add: Option<Role>,
    /// Badge-prefixed roles to strip
    pub remove: Vec<Role>,
}

impl BadgePlan {
    /// Nothing to add and nothing to remove
    #[inline]
    pub fn is_noop(&self) -> bool {
        self.add.is_none() && self.remove.is_empty()
    }

    pub fn remove_ids(&self) -> Vec<Snowflake> {
        self.remove.iter().map(|role| role.id).collect()
    }

    /// Names of the roles to remove, joined for log output
    pub fn remove_names(&self) -> String {
        self.remove
            .iter()
            .map(|role| role.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
