// Core collection logic

pub mod config;
pub mod registry;
pub mod system_stats;

// Re-export commonly used items
pub use config::{AgentConfig, CollectorConfig, GlobalConfig};
pub use registry::{Input, InputRegistry};
pub use system_stats::{FieldSet, Sample, SampleQueue, SystemStats};
