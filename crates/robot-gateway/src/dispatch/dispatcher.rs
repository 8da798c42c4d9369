//! Event dispatcher
//!
//! Routes decoded platform events to the services. Handler failures are
//! logged here and never reach the gateway session.

use std::sync::Arc;

use robot_core::{year_role_sequence, GuildMember, GuildRoles, Message, PlatformEvent, Snowflake};
use robot_service::{
    BadgeService, CommandService, DoorbellService, InviteService, ServiceContext, ServiceError,
    ServiceResult, StatusLog,
};
use tracing::{debug, error, info, instrument, warn};

use super::DispatchState;

/// Routes events to services
#[derive(Clone)]
pub struct EventDispatcher {
    ctx: ServiceContext,
    state: Arc<DispatchState>,
}

impl EventDispatcher {
    /// Create a new event dispatcher
    pub fn new(ctx: ServiceContext) -> Self {
        Self {
            ctx,
            state: Arc::new(DispatchState::new()),
        }
    }

    /// Get the service context
    pub fn context(&self) -> &ServiceContext {
        &self.ctx
    }

    /// Get the dispatch state
    pub fn state(&self) -> &DispatchState {
        &self.state
    }

    /// Handle one event
    pub async fn dispatch(&self, event: PlatformEvent) {
        if let Some(guild_id) = event.guild_id() {
            if guild_id != self.ctx.guild_id() {
                debug!(guild_id = %guild_id, event = event.event_type(), "Ignoring other guild");
                return;
            }
        }

        let event_type = event.event_type();
        let result = match event {
            PlatformEvent::Ready { user_id, username } => {
                info!(user_id = %user_id, "Logged in as {username}");
                Ok(())
            }
            PlatformEvent::GuildAvailable { guild_id } => self.on_guild_available(guild_id).await,
            PlatformEvent::MemberJoin(member) => self.on_member_join(&member).await,
            PlatformEvent::MemberUpdate(member) => self.on_member_update(&member).await,
            PlatformEvent::MessageCreate(message) => self.on_message(&message).await,
        };

        if let Err(e) = result {
            log_failure(event_type, &e);
        }
    }

    /// Startup for a guild: channels, invite snapshot, member cache, badges
    #[instrument(skip(self))]
    async fn on_guild_available(&self, guild_id: Snowflake) -> ServiceResult<()> {
        let platform = self.ctx.platform();

        StatusLog::new(&self.ctx).resolve_channels(guild_id).await?;

        match platform.guild_invites(guild_id).await {
            Ok(invites) => self.state.store_invites(guild_id, &invites),
            Err(e) => warn!(error = %e, "Could not read invites, the next join only records invite counters"),
        }

        let members = platform.guild_members(guild_id).await?;
        self.state.seed_members(&members);

        BadgeService::new(&self.ctx).reconcile_all(guild_id).await?;
        Ok(())
    }

    #[instrument(skip(self, member), fields(user_id = %member.user_id))]
    async fn on_member_join(&self, member: &GuildMember) -> ServiceResult<()> {
        info!("{} joined", member.username);

        let invites = self.ctx.platform().guild_invites(member.guild_id).await?;
        let used = self.state.take_used_invite(member.guild_id, &invites);
        self.state.replace_member_roles(member);

        InviteService::new(&self.ctx)
            .handle_join(member, used.as_ref())
            .await?;
        Ok(())
    }

    /// Reconcile when the member's year roles changed
    #[instrument(skip(self, member), fields(user_id = %member.user_id))]
    async fn on_member_update(&self, member: &GuildMember) -> ServiceResult<()> {
        let previous = self.state.replace_member_roles(member);

        let roles = GuildRoles::new(
            member.guild_id,
            self.ctx.platform().guild_roles(member.guild_id).await?,
        );
        let affixes = self.ctx.affixes();
        let after = year_role_sequence(&roles.member_roles(member), affixes);

        if let Some(role_ids) = previous {
            let before_member = GuildMember {
                role_ids,
                ..member.clone()
            };
            let before = year_role_sequence(&roles.member_roles(&before_member), affixes);
            if before == after {
                debug!("Year roles unchanged");
                return Ok(());
            }
        }

        BadgeService::new(&self.ctx).reconcile(&roles, member).await?;
        Ok(())
    }

    async fn on_message(&self, message: &Message) -> ServiceResult<()> {
        let doorbell = DoorbellService::new(&self.ctx).handle_message(message).await;
        let command = CommandService::new(&self.ctx).handle_message(message).await;

        doorbell?;
        command?;
        Ok(())
    }
}

fn log_failure(event_type: &str, e: &ServiceError) {
    if e.is_configuration() || matches!(e, ServiceError::PermissionDenied { .. }) {
        warn!(event = event_type, code = e.error_code(), error = %e, "Event handler stopped");
    } else {
        error!(event = event_type, code = e.error_code(), error = %e, "Event handler failed");
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("guild_id", &self.ctx.guild_id())
            .field("cached_members", &self.state.cached_members())
            .finish_non_exhaustive()
    }
}
