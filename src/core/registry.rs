//! Explicit registry of input constructors, populated by the host application.

use std::collections::BTreeMap;

use super::config::{CollectorConfig, GlobalConfig};
use super::system_stats::{SampleQueue, SystemStats, INPUT_NAME};
use crate::error::{Result, SysgatherError};

/// A metric input with a start/stop lifecycle.
pub trait Input: Send {
    fn name(&self) -> &str;

    /// Begin producing samples onto `queue`. Must not block.
    fn start(&mut self, queue: SampleQueue) -> Result<()>;

    /// Request termination. Safe to call more than once.
    fn stop(&self);
}

impl Input for SystemStats {
    fn name(&self) -> &str {
        INPUT_NAME
    }

    fn start(&mut self, queue: SampleQueue) -> Result<()> {
        SystemStats::start(self, queue)
    }

    fn stop(&self) {
        SystemStats::stop(self)
    }
}

/// Builds an input from its raw `[inputs.<name>]` table and the global settings.
pub type InputConstructor = fn(Option<&toml::Value>, &GlobalConfig) -> Result<Box<dyn Input>>;

#[derive(Default)]
pub struct InputRegistry {
    constructors: BTreeMap<String, InputConstructor>,
}

impl InputRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every input shipped in this crate.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(INPUT_NAME, build_system_stats);
        registry
    }

    /// Register a constructor, replacing any previous one under the same name.
    pub fn register(&mut self, name: &str, constructor: InputConstructor) {
        if self
            .constructors
            .insert(name.to_string(), constructor)
            .is_some()
        {
            log::warn!("Input {} registered twice, keeping the latest", name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered input names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }

    pub fn build(
        &self,
        name: &str,
        table: Option<&toml::Value>,
        global: &GlobalConfig,
    ) -> Result<Box<dyn Input>> {
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| SysgatherError::unknown_input(name))?;
        constructor(table, global)
    }
}

fn build_system_stats(table: Option<&toml::Value>, global: &GlobalConfig) -> Result<Box<dyn Input>> {
    let config = CollectorConfig::from_value(table)?;
    Ok(Box::new(SystemStats::new(config, global.interval())))
}
