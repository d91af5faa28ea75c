//! Kernel configuration.

use crate::error::{KernelError, KernelResult};
use crate::time::SimTime;

/// Thirty days, in hours.
const DEFAULT_ANNOUNCEMENT_INTERVAL: f64 = 720.0;

/// Settings that shape the self-renewing parts of the schedule.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct KernelConfig {
    /// Hours between one cargo announcement's target time and the next.
    pub announcement_interval: f64,
    /// Announcements targeting a time after this are not renewed.
    /// `None` keeps the announcement cycle going forever.
    pub announcement_horizon: Option<SimTime>,
}

impl KernelConfig {
    /// Announce every `interval` hours with no horizon.
    pub fn with_interval(interval: f64) -> Self {
        KernelConfig {
            announcement_interval: interval,
            announcement_horizon: None,
        }
    }

    /// Stop renewing announcements past `horizon`.
    pub fn with_horizon(mut self, horizon: SimTime) -> Self {
        self.announcement_horizon = Some(horizon);
        self
    }

    /// Reject settings that would stall or corrupt the schedule.
    pub fn validate(&self) -> KernelResult<()> {
        if !self.announcement_interval.is_finite() || self.announcement_interval <= 0.0 {
            return Err(KernelError::InvalidConfig(format!(
                "announcement_interval must be positive and finite, got {}",
                self.announcement_interval
            )));
        }
        if let Some(horizon) = self.announcement_horizon {
            if !horizon.is_finite() {
                return Err(KernelError::InvalidConfig(format!(
                    "announcement_horizon must be finite, got {}",
                    horizon
                )));
            }
        }
        Ok(())
    }

    /// Whether an announcement targeting `target` should still be scheduled.
    pub fn renews_announcement_for(&self, target: SimTime) -> bool {
        match self.announcement_horizon {
            Some(horizon) => target <= horizon,
            None => true,
        }
    }

    /// Parse and validate a JSON config document.
    #[cfg(feature = "serialize")]
    pub fn from_json_str(raw: &str) -> KernelResult<Self> {
        let config: KernelConfig = serde_json::from_str(raw)
            .map_err(|e| KernelError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self::with_interval(DEFAULT_ANNOUNCEMENT_INTERVAL)
    }
}
