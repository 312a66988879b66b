use thiserror::Error as ThisError;

/// Errors that can occur while setting up loggers.
///
/// Logging calls themselves never return an error; these are reported only
/// by configuration, registry lookup and subscriber initialization.
#[derive(ThisError, Debug)]
pub enum Error {
    /// I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),
    /// Initialization failed.
    #[error("Initialization error: {0}")]
    Init(String),
    /// A logger name was rejected by the registry.
    #[error("Invalid logger name {0:?}: a logger name must be non-empty printable text")]
    InvalidName(String),
    /// A level name did not match any known tier.
    #[error("Unknown log level: {0:?}")]
    UnknownLevel(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
