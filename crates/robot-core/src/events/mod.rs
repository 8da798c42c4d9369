//! Platform events delivered to the bot

mod platform_event;

pub use platform_event::PlatformEvent;
