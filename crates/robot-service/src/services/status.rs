//! Status log
//!
//! Every change the bot makes to the guild is reported twice: as a tracing
//! event and as a message in the status channel, so moderators can follow
//! along without access to the host.

use robot_core::{Channel, Snowflake};
use tracing::{info, instrument, warn};

use super::context::{KnownChannels, ServiceContext};
use super::error::ServiceResult;

/// Status channel writer
pub struct StatusLog<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> StatusLog<'a> {
    /// Create a new StatusLog
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Look up the status and doorbell channels by name and remember their ids
    #[instrument(skip(self))]
    pub async fn resolve_channels(&self, guild_id: Snowflake) -> ServiceResult<KnownChannels> {
        let channels = self.ctx.platform().guild_channels(guild_id).await?;
        let settings = &self.ctx.config().settings;

        let known = KnownChannels {
            status: find_text_channel(&channels, &settings.status_channel_name),
            doorbell: settings
                .doorbell
                .as_ref()
                .and_then(|doorbell| find_text_channel(&channels, &doorbell.channel)),
        };

        if known.status.is_none() {
            warn!(
                channel = %settings.status_channel_name,
                "Status channel not found, status messages go to the console only"
            );
        }
        if settings.doorbell.is_some() && known.doorbell.is_none() {
            warn!("Doorbell channel not found, the doorbell will not answer");
        }

        self.ctx.set_known_channels(known);
        Ok(known)
    }

    /// Report a state change
    pub async fn info(&self, message: &str) {
        info!(target: "status", "{message}");
        self.post(message).await;
    }

    /// Report a problem that aborted an operation
    pub async fn warn(&self, message: &str) {
        warn!(target: "status", "{message}");
        self.post(message).await;
    }

    async fn post(&self, message: &str) {
        let Some(channel_id) = self.ctx.known_channels().status else {
            return;
        };
        if let Err(e) = self.ctx.platform().send_message(channel_id, message).await {
            warn!(channel_id = %channel_id, error = %e, "Failed to post to the status channel");
        }
    }
}

fn find_text_channel(channels: &[Channel], name: &str) -> Option<Snowflake> {
    channels
        .iter()
        .find(|channel| channel.is_text() && channel.is_named(name))
        .map(|channel| channel.id)
}
