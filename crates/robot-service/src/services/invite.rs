//! Invite service
//!
//! Grants the role tied to an invite channel to members who joined through
//! that channel's invite, then brings their badge up to date.

use robot_core::{DomainError, GuildMember, GuildRoles, Invite, Role};
use tracing::{debug, instrument};

use super::badge::BadgeService;
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::status::StatusLog;

/// Invite service
pub struct InviteService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> InviteService<'a> {
    /// Create a new InviteService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Handle a member join
    ///
    /// `used_invite` is the invite whose counter moved, if one could be told
    /// apart. Returns the granted role.
    #[instrument(skip(self, member, used_invite), fields(user_id = %member.user_id))]
    pub async fn handle_join(
        &self,
        member: &GuildMember,
        used_invite: Option<&Invite>,
    ) -> ServiceResult<Option<Role>> {
        let mut member = member.clone();

        let granted = match used_invite {
            Some(invite) => self.apply_invite_role(&member, invite).await?,
            None => {
                debug!(user = %member.username, "Could not tell which invite was used");
                None
            }
        };

        if let Some(role) = &granted {
            member.add_role(role.id);
        }
        BadgeService::new(self.ctx).reconcile_member(&member).await?;

        Ok(granted)
    }

    /// Give the member the role configured for the invite's channel
    ///
    /// # Errors
    /// `RoleNotFound` when the configured role does not exist in the guild.
    pub async fn apply_invite_role(
        &self,
        member: &GuildMember,
        invite: &Invite,
    ) -> ServiceResult<Option<Role>> {
        let Some(channel) = invite.channel_name.as_deref() else {
            return Ok(None);
        };
        let Some(rule) = self.ctx.config().settings.invite_rule(channel) else {
            debug!(code = %invite.code, channel, "No role configured for invite channel");
            return Ok(None);
        };

        let roles = GuildRoles::new(
            member.guild_id,
            self.ctx.platform().guild_roles(member.guild_id).await?,
        );
        let status = StatusLog::new(self.ctx);

        let Some(role) = roles.find_by_name(&rule.role).cloned() else {
            let err = DomainError::RoleNotFound(rule.role.clone());
            status.warn(&format!("Aborted: {err}.")).await;
            return Err(err.into());
        };

        self.ctx
            .platform()
            .add_member_role(member.guild_id, member.user_id, role.id)
            .await?;
        status
            .info(&format!(
                "{} assigned the role \"{}\".",
                member.username, channel
            ))
            .await;

        Ok(Some(role))
    }
}
