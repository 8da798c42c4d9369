//! Doorbell service
//!
//! A message in the doorbell channel pulses the relay wired to the door
//! opener and gets a reply in the same channel.

use robot_core::{GuildRoles, Message};
use tracing::{debug, info, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Reply used when the relay is not driven
pub const DEBUG_MODE_REPLY: &str = "Doorbell disabled in debug mode.";

/// What happened to a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorbellOutcome {
    /// Not a doorbell message
    Ignored,
    /// The author lacks the allowed role
    Denied,
    /// Development mode, relay untouched
    Disabled,
    /// Relay pulsed
    Rang,
}

/// Doorbell service
pub struct DoorbellService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> DoorbellService<'a> {
    /// Create a new DoorbellService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, message), fields(channel_id = %message.channel_id))]
    pub async fn handle_message(&self, message: &Message) -> ServiceResult<DoorbellOutcome> {
        let Some(doorbell) = self.ctx.config().settings.doorbell.as_ref() else {
            return Ok(DoorbellOutcome::Ignored);
        };
        // Bots never ring, which also keeps the bot from answering itself
        if message.author.bot {
            return Ok(DoorbellOutcome::Ignored);
        }
        if self.ctx.known_channels().doorbell != Some(message.channel_id) {
            return Ok(DoorbellOutcome::Ignored);
        }

        let platform = self.ctx.platform();
        let author = &message.author.username;

        if let Some(role_name) = doorbell.allowed_role() {
            let guild_id = message.guild_id.unwrap_or_else(|| self.ctx.guild_id());
            let roles = GuildRoles::new(guild_id, platform.guild_roles(guild_id).await?);
            let allowed = roles
                .iter()
                .any(|role| role.name == role_name && message.author_has_role(role.id));
            if !allowed {
                platform
                    .send_message(message.channel_id, &self.ctx.config().responses.invalid_role)
                    .await?;
                info!("{author} tried to use the doorbell.");
                return Ok(DoorbellOutcome::Denied);
            }
        }

        if self.ctx.config().env.is_development() {
            platform.send_message(message.channel_id, DEBUG_MODE_REPLY).await?;
            debug!("{DEBUG_MODE_REPLY}");
            return Ok(DoorbellOutcome::Disabled);
        }

        self.ctx.relay().pulse(doorbell.pin, doorbell.pulse()).await?;
        platform
            .send_message(message.channel_id, &self.ctx.config().responses.ok)
            .await?;
        info!(pin = doorbell.pin, "{author} used the doorbell.");

        Ok(DoorbellOutcome::Rang)
    }
}
