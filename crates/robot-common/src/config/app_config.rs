//! Application configuration structs
//!
//! Settings and doorbell responses are read once at startup from two JSON
//! files. Every settings key can be overridden from the environment with the
//! `HOUSE_ROBOT__` prefix (`HOUSE_ROBOT__DOORBELL__PIN=18`), and
//! `DISCORD_TOKEN` overrides the token.

use std::collections::HashSet;
use std::env;
use std::path::Path;
use std::time::Duration;

use config::{Config, File, FileFormat};
use robot_core::{DomainError, RoleAffixes, Snowflake};
use serde::Deserialize;
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub settings: BotSettings,
    pub responses: DoorbellResponses,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Read the environment from `APP_ENV` (anything but `production` is development)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_var(env::var("APP_ENV").ok())
    }

    fn from_var(value: Option<String>) -> Self {
        match value.as_deref().map(str::to_lowercase).as_deref() {
            Some("production") => Self::Production,
            _ => Self::Development,
        }
    }
}

/// Contents of `settings.json`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BotSettings {
    #[serde(default)]
    #[validate(length(min = 1, message = "discord_token is required"))]
    pub discord_token: String,

    pub guild_id: Snowflake,

    #[validate(length(min = 1, message = "year_role_prefix must not be empty"))]
    pub year_role_prefix: String,
    #[validate(length(min = 1, message = "badge_role_prefix must not be empty"))]
    pub badge_role_prefix: String,
    #[validate(length(min = 1, message = "badge_role_suffix must not be empty"))]
    pub badge_role_suffix: String,

    /// Channel receiving the status log
    #[validate(length(min = 1, max = 100))]
    pub status_channel_name: String,

    /// Role allowed to run administrator commands
    #[serde(default = "default_admin_role")]
    pub admin_role: String,

    #[serde(default = "default_command_prefix")]
    #[validate(length(min = 1))]
    pub command_prefix: String,

    #[serde(default)]
    #[validate(nested)]
    pub doorbell: Option<DoorbellSettings>,

    #[serde(default)]
    #[validate(nested)]
    pub invites: Vec<InviteRule>,

    #[serde(default)]
    #[validate(nested)]
    pub edition: Option<EditionSettings>,

    #[serde(default)]
    pub connection: ConnectionSettings,
}

/// Doorbell relay settings
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DoorbellSettings {
    /// Channel the doorbell listens in
    #[validate(length(min = 1))]
    pub channel: String,
    /// BCM pin number of the relay
    #[validate(range(max = 27, message = "pin must be a BCM GPIO number (0-27)"))]
    pub pin: u8,
    /// Only members with this role may ring (empty or absent: everyone)
    #[serde(default)]
    pub allowed_user_role: Option<String>,
    #[serde(default = "default_pulse_ms")]
    #[validate(range(min = 10, max = 10_000))]
    pub pulse_ms: u64,
}

impl DoorbellSettings {
    pub fn pulse(&self) -> Duration {
        Duration::from_millis(self.pulse_ms)
    }

    /// The role gate, treating an empty string as "no gate"
    pub fn allowed_role(&self) -> Option<&str> {
        self.allowed_user_role.as_deref().filter(|role| !role.is_empty())
    }
}

/// Role granted to members joining through an invite to `channel`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InviteRule {
    #[validate(length(min = 1))]
    pub channel: String,
    #[validate(length(min = 1))]
    pub role: String,
}

/// Template for provisioning a new program edition
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EditionSettings {
    #[validate(length(min = 1))]
    pub category_prefix: String,
    #[serde(default)]
    pub category_permissions: Vec<PermissionEntry>,
    #[serde(default)]
    #[validate(nested)]
    pub channels: Vec<ChannelTemplate>,
}

/// One text channel of an edition
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChannelTemplate {
    #[validate(length(min = 1, max = 100, message = "Channel name must be 1-100 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 1024, message = "Topic must be at most 1024 characters"))]
    pub topic: String,
    #[serde(default)]
    pub permissions: Vec<PermissionEntry>,
}

/// Permission changes for one role, by permission attribute name
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PermissionEntry {
    pub role: String,
    #[serde(default)]
    pub add: Vec<String>,
    #[serde(default)]
    pub remove: Vec<String>,
}

/// Gateway and REST connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionSettings {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            gateway_url: default_gateway_url(),
            retry_delay_secs: default_retry_delay_secs(),
        }
    }
}

impl ConnectionSettings {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

/// Contents of `responses.json`
#[derive(Debug, Clone, Deserialize)]
pub struct DoorbellResponses {
    pub ok: String,
    // The config crate lowercases keys before serde sees them
    #[serde(rename = "invalidRole", alias = "invalidrole")]
    pub invalid_role: String,
}

// Default value functions
fn default_admin_role() -> String {
    "Admin".to_string()
}

fn default_command_prefix() -> String {
    "!".to_string()
}

fn default_pulse_ms() -> u64 {
    500
}

fn default_api_base_url() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_gateway_url() -> String {
    "wss://gateway.discord.gg/?v=10&encoding=json".to_string()
}

fn default_retry_delay_secs() -> u64 {
    10
}

impl BotSettings {
    /// The affix triple driving badge reconciliation
    pub fn role_affixes(&self) -> Result<RoleAffixes, DomainError> {
        RoleAffixes::new(
            self.year_role_prefix.clone(),
            self.badge_role_prefix.clone(),
            self.badge_role_suffix.clone(),
        )
    }

    /// The invite rule for a channel name
    pub fn invite_rule(&self, channel: &str) -> Option<&InviteRule> {
        self.invites.iter().find(|rule| rule.channel == channel)
    }

    fn check(&self) -> Result<(), ConfigError> {
        self.validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if self.guild_id.is_zero() {
            return Err(ConfigError::Invalid("guild_id must be set".to_string()));
        }

        let mut seen = HashSet::new();
        if let Some(rule) = self.invites.iter().find(|rule| !seen.insert(rule.channel.as_str())) {
            return Err(ConfigError::Invalid(format!(
                "invite channel {} is listed twice",
                rule.channel
            )));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load configuration from the settings and responses files
    ///
    /// # Errors
    /// Returns an error if a file is missing, malformed, or fails validation
    pub fn load(settings_path: &Path, responses_path: &Path) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(settings_path).format(FileFormat::Json))
            .add_source(
                config::Environment::with_prefix("HOUSE_ROBOT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        let responses = Config::builder()
            .add_source(File::from(responses_path).format(FileFormat::Json))
            .build()?;

        Self::from_sources(settings, responses, env::var("APP_ENV").ok())
    }

    /// Load configuration from in-memory JSON documents
    ///
    /// # Errors
    /// Returns an error if a document is malformed or fails validation
    pub fn from_json(
        settings: &str,
        responses: &str,
        environment: Environment,
    ) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from_str(settings, FileFormat::Json))
            .build()?;
        let responses = Config::builder()
            .add_source(File::from_str(responses, FileFormat::Json))
            .build()?;

        let mut config = Self::from_sources(settings, responses, None)?;
        config.env = environment;
        Ok(config)
    }

    fn from_sources(
        settings: Config,
        responses: Config,
        app_env: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut settings: BotSettings = settings.try_deserialize()?;
        if let Ok(token) = env::var("DISCORD_TOKEN") {
            settings.discord_token = token;
        }
        settings.check()?;

        Ok(Self {
            env: Environment::from_var(app_env),
            settings,
            responses: responses.try_deserialize()?,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Source(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
