//! Selection manager settings

use serde::{Deserialize, Serialize};

use crate::time::Duration;
use crate::SelectionError;

/// Tunables for resolution and scrolling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// How long stale details may stay visible while a resolution runs
    pub grace_period_ms: u64,

    /// Span width used to focus instant events and point notes
    pub instant_focus_duration: Duration,

    /// Span width used to focus events that never finished
    pub incomplete_slice_duration: Duration,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            grace_period_ms: 50,
            instant_focus_duration: 1,
            incomplete_slice_duration: 30_000,
        }
    }
}

impl SelectionConfig {
    /// Parse a config from JSON, filling absent fields with defaults
    pub fn from_json(json: &str) -> Result<Self, SelectionError> {
        let config: SelectionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SelectionError> {
        if self.instant_focus_duration <= 0 {
            return Err(SelectionError::InvalidConfig(format!(
                "instant_focus_duration must be positive, got {}",
                self.instant_focus_duration
            )));
        }
        if self.incomplete_slice_duration <= 0 {
            return Err(SelectionError::InvalidConfig(format!(
                "incomplete_slice_duration must be positive, got {}",
                self.incomplete_slice_duration
            )));
        }
        Ok(())
    }

    pub fn grace_period(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.grace_period_ms)
    }
}
