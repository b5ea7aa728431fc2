//! Session lifecycle configuration

use serde::Deserialize;
use std::time::Duration;

use crate::application::{RegistrySettings, MAX_BUDGET_MINUTES, MIN_BUDGET_MINUTES};
use crate::domain::analysis::{DEFAULT_BUDGET_MINUTES, DEFAULT_WARNING_LEAD_MINUTES};

use super::error::ValidationError;

/// Session lifecycle configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SessionConfig {
    /// Budget for sessions created without one, in minutes
    #[serde(default = "default_budget_minutes")]
    pub default_budget_minutes: u32,

    /// How long before the budget the warning flag rises, in minutes
    #[serde(default = "default_warning_lead_minutes")]
    pub warning_lead_minutes: u32,

    /// How long ended sessions stay readable, in seconds
    #[serde(default = "default_eviction_grace_secs")]
    pub eviction_grace_secs: u64,

    /// How often the sweeper looks for expired sessions, in seconds
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl SessionConfig {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn registry_settings(&self) -> RegistrySettings {
        RegistrySettings {
            default_budget_minutes: self.default_budget_minutes,
            warning_lead_minutes: self.warning_lead_minutes,
            eviction_grace_secs: self.eviction_grace_secs,
        }
    }

    /// Validate session configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(MIN_BUDGET_MINUTES..=MAX_BUDGET_MINUTES).contains(&self.default_budget_minutes) {
            return Err(ValidationError::InvalidBudget);
        }
        if self.warning_lead_minutes >= self.default_budget_minutes {
            return Err(ValidationError::InvalidWarningLead);
        }
        if self.sweep_interval_secs == 0 {
            return Err(ValidationError::InvalidSweepInterval);
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_budget_minutes: default_budget_minutes(),
            warning_lead_minutes: default_warning_lead_minutes(),
            eviction_grace_secs: default_eviction_grace_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

fn default_budget_minutes() -> u32 {
    DEFAULT_BUDGET_MINUTES
}

fn default_warning_lead_minutes() -> u32 {
    DEFAULT_WARNING_LEAD_MINUTES
}

fn default_eviction_grace_secs() -> u64 {
    300
}

fn default_sweep_interval_secs() -> u64 {
    30
}
