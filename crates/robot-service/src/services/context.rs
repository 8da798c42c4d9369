//! Service context - dependency container for services
//!
//! Holds the platform port, the relay, the loaded configuration and the
//! channel ids resolved when the guild becomes available.

use std::sync::Arc;

use parking_lot::RwLock;
use robot_common::AppConfig;
use robot_core::{GuildPlatform, Relay, RoleAffixes, Snowflake};

use super::error::{ServiceError, ServiceResult};

/// Channel ids looked up by name from the settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KnownChannels {
    pub status: Option<Snowflake>,
    pub doorbell: Option<Snowflake>,
}

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    platform: Arc<dyn GuildPlatform>,
    relay: Arc<dyn Relay>,
    config: Arc<AppConfig>,
    affixes: RoleAffixes,
    channels: Arc<RwLock<KnownChannels>>,
}

impl ServiceContext {
    /// Create a new service context
    ///
    /// # Errors
    /// Returns an error if the configured role affixes are empty
    pub fn new(
        platform: Arc<dyn GuildPlatform>,
        relay: Arc<dyn Relay>,
        config: Arc<AppConfig>,
    ) -> ServiceResult<Self> {
        let affixes = config.settings.role_affixes()?;
        Ok(Self {
            platform,
            relay,
            config,
            affixes,
            channels: Arc::new(RwLock::new(KnownChannels::default())),
        })
    }

    // === Ports ===

    pub fn platform(&self) -> &dyn GuildPlatform {
        self.platform.as_ref()
    }

    pub fn relay(&self) -> &dyn Relay {
        self.relay.as_ref()
    }

    // === Configuration ===

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The single guild this bot manages
    pub fn guild_id(&self) -> Snowflake {
        self.config.settings.guild_id
    }

    pub fn affixes(&self) -> &RoleAffixes {
        &self.affixes
    }

    // === Resolved channels ===

    pub fn known_channels(&self) -> KnownChannels {
        *self.channels.read()
    }

    pub fn set_known_channels(&self, channels: KnownChannels) {
        *self.channels.write() = channels;
    }
}

/// Builder for creating ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    platform: Option<Arc<dyn GuildPlatform>>,
    relay: Option<Arc<dyn Relay>>,
    config: Option<Arc<AppConfig>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn platform(mut self, platform: Arc<dyn GuildPlatform>) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn relay(mut self, relay: Arc<dyn Relay>) -> Self {
        self.relay = Some(relay);
        self
    }

    pub fn config(mut self, config: Arc<AppConfig>) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        ServiceContext::new(
            self.platform
                .ok_or_else(|| ServiceError::validation("platform is required"))?,
            self.relay
                .ok_or_else(|| ServiceError::validation("relay is required"))?,
            self.config
                .ok_or_else(|| ServiceError::validation("config is required"))?,
        )
    }
}
