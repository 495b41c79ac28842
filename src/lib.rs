// sysgather library - public API

// Re-export error types
pub mod error;
pub use error::{Result, SysgatherError};

// Module declarations
pub mod commands;
pub mod core;
pub mod platform;

// Re-export commonly used types
pub use crate::core::config::{AgentConfig, CollectorConfig};
pub use crate::core::registry::{Input, InputRegistry};
pub use crate::core::system_stats::{Sample, SystemStats};

// Initialize logging
pub fn init_logging() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
