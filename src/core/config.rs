use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{Result, SysgatherError};

pub const DEFAULT_CONFIG_PATH: &str = "conf/sysgather.toml";

const DEFAULT_INTERVAL_SECS: u64 = 15;
const DEFAULT_QUEUE_CAPACITY: usize = 1000;

/// Top-level agent configuration file.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default)]
    pub global: GlobalConfig,
    /// Raw per-input tables, handed to the registered constructor by name
    #[serde(default)]
    pub inputs: BTreeMap<String, toml::Value>,
}

/// Process-wide settings shared by every input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Default tick interval in seconds
    #[serde(default = "default_interval")]
    pub interval: u64,
    /// Capacity of the shared sample queue
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_interval() -> u64 {
    DEFAULT_INTERVAL_SECS
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL_SECS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl GlobalConfig {
    /// The default tick interval applied to inputs without an override.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }
}

impl AgentConfig {
    /// Load the agent configuration.
    ///
    /// A missing file yields the default configuration.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("Config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        if config.global.interval == 0 {
            return Err(SysgatherError::config(
                "global.interval must be greater than zero",
            ));
        }
        if config.global.queue_capacity == 0 {
            return Err(SysgatherError::config(
                "global.queue_capacity must be greater than zero",
            ));
        }
        Ok(config)
    }

    /// Names of the inputs to run. Defaults to `system` when no table is present.
    pub fn enabled_inputs(&self) -> Vec<String> {
        if self.inputs.is_empty() {
            vec![crate::core::system_stats::INPUT_NAME.to_string()]
        } else {
            self.inputs.keys().cloned().collect()
        }
    }
}

/// Configuration of the `system` input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectorConfig {
    /// Overrides the global tick interval when non-zero
    #[serde(default)]
    pub interval_seconds: u64,
    #[serde(default)]
    pub collect_user_number: bool,
    #[serde(default)]
    pub print_configs: bool,
}

impl CollectorConfig {
    /// Build from an optional `[inputs.system]` table.
    pub fn from_value(value: Option<&toml::Value>) -> Result<Self> {
        match value {
            Some(value) => Ok(value.clone().try_into()?),
            None => Ok(Self::default()),
        }
    }

    /// Effective tick interval given the process-wide default.
    pub fn interval(&self, default: Duration) -> Duration {
        if self.interval_seconds != 0 {
            Duration::from_secs(self.interval_seconds)
        } else {
            default
        }
    }
}
