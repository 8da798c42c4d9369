//! Relay adapters for the doorbell

mod sysfs;

pub use sysfs::SysfsRelay;

use std::time::Duration;

use async_trait::async_trait;
use robot_core::{DomainError, Relay};

/// Relay that only logs, used in development where no GPIO is wired
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRelay;

#[async_trait]
impl Relay for NoopRelay {
    async fn pulse(&self, pin: u8, duration: Duration) -> Result<(), DomainError> {
        tracing::info!(pin, duration_ms = duration.as_millis(), "Relay pulse skipped");
        Ok(())
    }
}
