//! Administrator commands typed in the status channel

use robot_core::{GuildRoles, Message};
use tracing::{debug, instrument, warn};

use super::context::ServiceContext;
use super::edition::{EditionReport, EditionService};
use super::error::{ServiceError, ServiceResult};
use super::status::StatusLog;

/// Result of looking at a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Not a command for this bot
    Ignored,
    Provisioned(EditionReport),
}

/// Command service
pub struct CommandService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommandService<'a> {
    /// Create a new CommandService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Run the command carried by a status channel message, if any
    ///
    /// # Errors
    /// `PermissionDenied` when the author lacks the admin role,
    /// `Validation` for a malformed year, plus whatever provisioning returns.
    #[instrument(skip(self, message), fields(author = %message.author.username))]
    pub async fn handle_message(&self, message: &Message) -> ServiceResult<CommandOutcome> {
        if message.author.bot || self.ctx.known_channels().status != Some(message.channel_id) {
            return Ok(CommandOutcome::Ignored);
        }
        let settings = &self.ctx.config().settings;
        let prefix = settings.command_prefix.as_str();
        let Some((name, args)) = message.command(prefix) else {
            return Ok(CommandOutcome::Ignored);
        };
        if name != "edition" {
            debug!(command = name, "Unknown command");
            return Ok(CommandOutcome::Ignored);
        }

        let guild_id = message.guild_id.unwrap_or_else(|| self.ctx.guild_id());
        let status = StatusLog::new(self.ctx);

        let roles = GuildRoles::new(guild_id, self.ctx.platform().guild_roles(guild_id).await?);
        let is_admin = roles
            .iter()
            .any(|role| role.name == settings.admin_role && message.author_has_role(role.id));
        if !is_admin {
            warn!(
                "{} tried to run {prefix}edition without the {} role",
                message.author.username, settings.admin_role
            );
            return Err(ServiceError::permission_denied(settings.admin_role.clone()));
        }

        let year = match args.as_slice() {
            [year] => year.parse::<u16>().ok(),
            _ => None,
        };
        let Some(year) = year else {
            status.warn(&format!("Usage: {prefix}edition <year>")).await;
            return Err(ServiceError::validation(format!(
                "expected a single year, got {:?}",
                args.join(" ")
            )));
        };

        let report = EditionService::new(self.ctx).provision(guild_id, year).await?;
        Ok(CommandOutcome::Provisioned(report))
    }
}
