//! REST adapter for the guild platform port

mod client;
mod platform;

pub use client::{RestClient, RestError};
pub use platform::RestPlatform;
