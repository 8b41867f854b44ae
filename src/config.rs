//! # Engine Configuration
//!
//! Typed configuration consumed by the workflow engine: the estimate
//! auto-approval threshold, the container statuses eligible for washing, and
//! operational knobs. Values come from defaults, a TOML file, or `DEPOT_*`
//! environment variables, in that order of precedence.

use crate::constants::{DEFAULT_AUTO_APPROVAL_THRESHOLD, DEFAULT_EVENT_CHANNEL_CAPACITY};
use crate::error::{DepotError, Result};
use crate::state_machine::ContainerStatus;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepotConfig {
    /// Estimates at or below this total cost are auto-approved on creation
    #[serde(default = "default_threshold")]
    pub auto_approval_threshold: f64,

    /// Container statuses from which a washing order may be created
    #[serde(default = "default_washing_eligible")]
    pub washing_eligible_statuses: Vec<ContainerStatus>,

    /// Capacity of the lifecycle event broadcast channel
    #[serde(default = "default_event_capacity")]
    pub event_channel_capacity: usize,

    /// Free-form host settings, passed through untouched
    #[serde(default)]
    pub custom_settings: HashMap<String, String>,
}

fn default_threshold() -> f64 {
    DEFAULT_AUTO_APPROVAL_THRESHOLD
}

fn default_washing_eligible() -> Vec<ContainerStatus> {
    vec![ContainerStatus::Completed, ContainerStatus::PendingWash]
}

fn default_event_capacity() -> usize {
    DEFAULT_EVENT_CHANNEL_CAPACITY
}

impl Default for DepotConfig {
    fn default() -> Self {
        Self {
            auto_approval_threshold: default_threshold(),
            washing_eligible_statuses: default_washing_eligible(),
            event_channel_capacity: default_event_capacity(),
            custom_settings: HashMap::new(),
        }
    }
}

impl DepotConfig {
    /// Build a configuration from defaults plus `DEPOT_*` environment overrides
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(threshold) = std::env::var("DEPOT_AUTO_APPROVAL_THRESHOLD") {
            config.auto_approval_threshold = threshold.parse().map_err(|e| {
                DepotError::Configuration {
                    message: format!("invalid auto_approval_threshold: {e}"),
                }
            })?;
        }

        if let Ok(capacity) = std::env::var("DEPOT_EVENT_CHANNEL_CAPACITY") {
            config.event_channel_capacity = capacity.parse().map_err(|e| {
                DepotError::Configuration {
                    message: format!("invalid event_channel_capacity: {e}"),
                }
            })?;
        }

        Ok(config)
    }

    /// Load a TOML configuration file, layered with `DEPOT_*` environment
    /// overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("DEPOT"))
            .build()
            .map_err(|e| DepotError::Configuration {
                message: e.to_string(),
            })?;

        settings
            .try_deserialize()
            .map_err(|e| DepotError::Configuration {
                message: e.to_string(),
            })
    }

    /// Whether a container in `status` is eligible for a washing order
    pub fn is_washing_eligible(&self, status: ContainerStatus) -> bool {
        self.washing_eligible_statuses.contains(&status)
    }
}
