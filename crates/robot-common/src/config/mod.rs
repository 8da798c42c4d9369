//! Configuration management

mod app_config;

pub use app_config::{
    AppConfig, BotSettings, ChannelTemplate, ConfigError, ConnectionSettings, DoorbellResponses,
    DoorbellSettings, EditionSettings, Environment, InviteRule, PermissionEntry,
};
