//! Ports - interfaces to the chat platform and the relay hardware

mod platform;

pub use platform::{ChannelEdit, GuildPlatform, NewChannel, PlatformResult, Relay};
