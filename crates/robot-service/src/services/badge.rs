//! Badge service
//!
//! Applies the seniority badge plan computed by the domain ladder to a
//! member. The add is issued before the removal, so a member is never left
//! without a badge while one is owed.

use robot_core::{BadgeLadder, BadgePlan, GuildMember, GuildRoles, Snowflake};
use tracing::{debug, info, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::status::StatusLog;

/// Outcome of reconciling every member of a guild
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub members: usize,
    pub changed: usize,
    pub failed: usize,
}

/// Badge service
pub struct BadgeService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> BadgeService<'a> {
    /// Create a new BadgeService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Reconcile one member against a fresh copy of the guild's roles
    #[instrument(skip(self, member), fields(user_id = %member.user_id))]
    pub async fn reconcile_member(&self, member: &GuildMember) -> ServiceResult<BadgePlan> {
        let roles = self.guild_roles(member.guild_id).await?;
        self.reconcile(&roles, member).await
    }

    /// Reconcile one member against the given role list
    ///
    /// # Errors
    /// Platform rejections are returned as they are, without retry. When the
    /// add succeeded and the removal failed, the add stays in place.
    pub async fn reconcile(
        &self,
        roles: &GuildRoles,
        member: &GuildMember,
    ) -> ServiceResult<BadgePlan> {
        let affixes = self.ctx.affixes();
        let member_roles = roles.member_roles(member);
        let plan = BadgeLadder::from_guild(roles, affixes).plan(&member_roles, affixes);

        if plan.is_noop() {
            debug!(
                user_id = %member.user_id,
                years = plan.year_count,
                "Badge already correct"
            );
            return Ok(plan);
        }

        let status = StatusLog::new(self.ctx);
        let platform = self.ctx.platform();

        if let Some(badge) = &plan.add {
            status
                .info(&format!("Adding role {} to {}", badge.name, member.username))
                .await;
            platform
                .add_member_role(member.guild_id, member.user_id, badge.id)
                .await?;
        }

        if !plan.remove.is_empty() {
            status
                .info(&format!(
                    "Removing roles {} from {}",
                    plan.remove_names(),
                    member.username
                ))
                .await;
            platform
                .remove_member_roles(member.guild_id, member.user_id, &plan.remove_ids())
                .await?;
        }

        Ok(plan)
    }

    /// Reconcile every member of the guild
    ///
    /// A failure for one member is logged and does not stop the others.
    #[instrument(skip(self))]
    pub async fn reconcile_all(&self, guild_id: Snowflake) -> ServiceResult<ReconcileSummary> {
        let roles = self.guild_roles(guild_id).await?;
        let members = self.ctx.platform().guild_members(guild_id).await?;

        info!(guild_id = %guild_id, members = members.len(), "Adjusting badge roles");

        let mut summary = ReconcileSummary {
            members: members.len(),
            ..ReconcileSummary::default()
        };
        for member in &members {
            match self.reconcile(&roles, member).await {
                Ok(plan) if !plan.is_noop() => summary.changed += 1,
                Ok(_) => {}
                Err(e) => {
                    summary.failed += 1;
                    warn!(user_id = %member.user_id, error = %e, "Badge reconciliation failed");
                }
            }
        }

        info!(
            guild_id = %guild_id,
            changed = summary.changed,
            failed = summary.failed,
            "Done adjusting badge roles"
        );
        Ok(summary)
    }

    async fn guild_roles(&self, guild_id: Snowflake) -> ServiceResult<GuildRoles> {
        let roles = self.ctx.platform().guild_roles(guild_id).await?;
        Ok(GuildRoles::new(guild_id, roles))
    }
}
