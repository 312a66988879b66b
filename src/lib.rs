//! # Ringlog
//!
//! A leveled logging library with an in-memory line buffer and size-based
//! file rotation.
//!
//! ## Features
//!
//! - Five severity tiers with a per-logger threshold
//! - Colored console output
//! - File output with `app.log`, `app.log.1` .. `app.log.N` rotation
//! - A bounded buffer of recent lines, numbered for live retrieval as JSON
//! - Integration with the `tracing` ecosystem
//!
//! ## Example
//!
//! ```rust
//! use ringlog::{Level, Registry};
//!
//! let registry = Registry::new();
//! let logger = ringlog::LoggerBuilder::new("app")
//!     .with_level(Level::Info)
//!     .with_buffer(100)
//!     .with_console(false)
//!     .register(&registry)?;
//!
//! ringlog::info!(logger, "%d requests served", 42);
//! assert!(logger.recent_lines_json(10).contains("42 requests served"));
//! # Ok::<(), ringlog::Error>(())
//! ```

pub mod buffer;
pub mod builder;
pub mod config;
pub mod console;
pub mod error;
pub mod format;
pub mod level;
pub mod logger;
pub mod registry;
pub mod rotation;
pub mod writer;

#[cfg(feature = "tracing-layer")]
pub mod tracing_init;

pub use buffer::{LineBuffer, Lines};
pub use builder::LoggerBuilder;
pub use config::{FileLogConfig, LoggerConfig};
pub use console::{ColorChoice, ConsoleColorizer};
pub use error::{Error, Result};
pub use format::{Arg, FormatError};
pub use level::Level;
pub use logger::Logger;
pub use registry::Registry;
pub use rotation::RotationPolicy;
pub use writer::FileSink;

#[cfg(feature = "tracing-layer")]
pub use tracing_init::{LoggerLayer, init_logging};

/// Log a printf-style template at a given level.
///
/// ```rust
/// # let logger = ringlog::LoggerBuilder::new("doc").with_console(false).build()?;
/// ringlog::log!(logger, ringlog::Level::Warn, "queue at %d%%", 93);
/// # Ok::<(), ringlog::Error>(())
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $logger.log($level, $template, &[$($crate::Arg::from($arg)),*])
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($rest)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($rest)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Warn, $($rest)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($rest)+)
    };
}

#[macro_export]
macro_rules! critical {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Critical, $($rest)+)
    };
}
