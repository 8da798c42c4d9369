//! # robot-service
//!
//! Application layer: badge reconciliation, invite roles, the doorbell and
//! edition provisioning, written against the platform and relay ports.

pub mod services;

pub use services::{
    BadgeService, CommandOutcome, CommandService, DoorbellOutcome, DoorbellService,
    EditionReport, EditionService, InviteService, KnownChannels, ReconcileSummary, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult, StatusLog, DEBUG_MODE_REPLY,
};
