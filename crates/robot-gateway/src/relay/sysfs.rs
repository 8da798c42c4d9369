//! GPIO relay driven through the Linux sysfs interface

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use robot_core::{DomainError, Relay};

/// Default sysfs GPIO root
const GPIO_ROOT: &str = "/sys/class/gpio";

/// Relay on a GPIO line (`/sys/class/gpio/gpio<pin>`)
#[derive(Debug, Clone)]
pub struct SysfsRelay {
    root: PathBuf,
}

impl Default for SysfsRelay {
    fn default() -> Self {
        Self::new()
    }
}

impl SysfsRelay {
    pub fn new() -> Self {
        Self::with_root(GPIO_ROOT)
    }

    /// Use another GPIO root directory
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn line(&self, pin: u8) -> PathBuf {
        self.root.join(format!("gpio{pin}"))
    }

    async fn write(path: &Path, value: &str) -> Result<(), DomainError> {
        tokio::fs::write(path, value)
            .await
            .map_err(|e| DomainError::RelayError(format!("{}: {e}", path.display())))
    }

    /// Export the line and configure it as an output
    async fn prepare(&self, pin: u8) -> Result<PathBuf, DomainError> {
        let line = self.line(pin);
        if !tokio::fs::try_exists(&line).await.unwrap_or(false) {
            tracing::debug!(pin, "Exporting GPIO line");
            Self::write(&self.root.join("export"), &pin.to_string()).await?;
        }
        Self::write(&line.join("direction"), "out").await?;
        Ok(line)
    }
}

#[async_trait]
impl Relay for SysfsRelay {
    async fn pulse(&self, pin: u8, duration: Duration) -> Result<(), DomainError> {
        let line = self.prepare(pin).await?;
        let value = line.join("value");

        // The off write is attempted whatever happened to the on write
        let on = Self::write(&value, "1").await;
        if on.is_ok() {
            tokio::time::sleep(duration).await;
        }
        let off = Self::write(&value, "0").await;
        on.and(off)?;

        tracing::debug!(pin, duration_ms = duration.as_millis(), "Relay pulsed");
        Ok(())
    }
}
