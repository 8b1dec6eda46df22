//! Gateway configuration loading.
//!
//! Configuration is consumed once at setup and not re-validated at
//! runtime. A minimal file looks like:
//!
//! ```yaml
//! initial_messages:
//!   - SConfigSMemberId
//!   - AsfFlags
//! auto_update:
//!   - { message: Tboiler, interval_secs: 60 }
//!   - { message: Tdhw, interval_secs: 60 }
//! overrides:
//!   - TrSet
//! gates:
//!   dhw_enable: true
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use otgw_protocol::DataId;

/// Errors from loading or validating a gateway configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The file could not be parsed.
    #[error("failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// An auto-update entry has a zero interval.
    #[error("auto-update interval for {0} must be positive")]
    InvalidInterval(DataId),
}

/// One auto-update schedule entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AutoUpdateSpec {
    /// The message to poll.
    pub message: DataId,
    /// Refresh interval in seconds. Must be positive.
    pub interval_secs: u32,
}

/// Initial values for the status request gates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GateConfig {
    /// Permit CH enable.
    #[serde(default = "default_true")]
    pub ch_enable: bool,
    /// Permit DHW enable.
    #[serde(default = "default_true")]
    pub dhw_enable: bool,
    /// Permit cooling enable.
    #[serde(default = "default_true")]
    pub cooling_enable: bool,
    /// Permit OTC active.
    #[serde(default = "default_true")]
    pub otc_active: bool,
    /// Permit CH2 enable.
    #[serde(default = "default_true")]
    pub ch2_active: bool,
}

fn default_true() -> bool {
    true
}

impl Default for GateConfig {
    fn default() -> Self {
        GateConfig {
            ch_enable: true,
            dhw_enable: true,
            cooling_enable: true,
            otc_active: true,
            ch2_active: true,
        }
    }
}

/// The gateway configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Identifiers to query once at startup.
    #[serde(default)]
    pub initial_messages: Vec<DataId>,

    /// Identifiers to refresh periodically. Listing an identifier twice
    /// merges to the shorter non-zero interval.
    #[serde(default)]
    pub auto_update: Vec<AutoUpdateSpec>,

    /// Writable identifiers given an override slot.
    #[serde(default)]
    pub overrides: Vec<DataId>,

    /// Initial gate switch values.
    #[serde(default)]
    pub gates: GateConfig,
}

impl GatewayConfig {
    /// Parse a configuration from YAML text and validate it.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: GatewayConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_yaml(&fs::read_to_string(path)?)
    }

    /// Check the configuration for values that cannot be merged.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for spec in &self.auto_update {
            if spec.interval_secs == 0 {
                return Err(ConfigError::InvalidInterval(spec.message));
            }
        }
        Ok(())
    }

    /// Add an identifier to the initial poll set.
    pub fn add_initial_message(&mut self, id: DataId) {
        self.initial_messages.push(id);
    }

    /// Add an auto-update entry.
    pub fn add_auto_update_message(&mut self, id: DataId, interval_secs: u32) {
        self.auto_update.push(AutoUpdateSpec {
            message: id,
            interval_secs,
        });
    }
}
