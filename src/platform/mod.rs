// Platform-specific metric sources

mod host;
#[cfg(target_os = "linux")]
pub mod utmp;

pub use host::HostSource;

use std::io;
use thiserror::Error;

/// Classified failure of a single OS query.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("not supported on this platform: {0}")]
    Unsupported(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(io::Error),
}

impl From<io::Error> for SourceError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => SourceError::NotFound(err.to_string()),
            io::ErrorKind::PermissionDenied => SourceError::PermissionDenied(err.to_string()),
            io::ErrorKind::Unsupported => SourceError::Unsupported(err.to_string()),
            _ => SourceError::Io(err),
        }
    }
}

/// 1, 5 and 15 minute load averages
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

/// Synchronous OS queries behind one gather cycle.
///
/// Implementations are expected to return promptly; nothing here is time-bounded.
pub trait MetricSource: Send {
    fn load_average(&mut self) -> Result<LoadAverage, SourceError>;

    /// Logical (not physical) CPU core count.
    fn logical_cpus(&mut self) -> Result<usize, SourceError>;

    /// Seconds since boot.
    fn uptime(&mut self) -> Result<u64, SourceError>;

    /// Number of logged-in user sessions.
    fn user_count(&mut self) -> Result<usize, SourceError>;
}
