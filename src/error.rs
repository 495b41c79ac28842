use std::io;
use thiserror::Error;

/// Custom error type for the sysgather library
#[derive(Error, Debug)]
pub enum SysgatherError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unknown input: {0}")]
    UnknownInput(String),

    #[error("Input already started: {0}")]
    AlreadyStarted(String),

    #[error("No async runtime available: {0}")]
    NoRuntime(String),
}

/// Result type alias for the sysgather library
pub type Result<T> = std::result::Result<T, SysgatherError>;

impl SysgatherError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        SysgatherError::Config(msg.into())
    }

    pub fn unknown_input<S: Into<String>>(name: S) -> Self {
        SysgatherError::UnknownInput(name.into())
    }

    pub fn already_started<S: Into<String>>(name: S) -> Self {
        SysgatherError::AlreadyStarted(name.into())
    }
}
