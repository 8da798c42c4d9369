//! Bot services
//!
//! Each service borrows the shared [`ServiceContext`] and handles one
//! concern of the bot.

pub mod badge;
pub mod command;
pub mod context;
pub mod doorbell;
pub mod edition;
pub mod error;
pub mod invite;
pub mod status;

#[cfg(test)]
mod mock;

// Re-export all services for convenience
pub use badge::{BadgeService, ReconcileSummary};
pub use command::{CommandOutcome, CommandService};
pub use context::{KnownChannels, ServiceContext, ServiceContextBuilder};
pub use doorbell::{DoorbellOutcome, DoorbellService, DEBUG_MODE_REPLY};
pub use edition::{EditionReport, EditionService};
pub use error::{ServiceError, ServiceResult};
pub use invite::InviteService;
pub use status::StatusLog;
