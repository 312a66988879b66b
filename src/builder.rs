//! Builder pattern for creating loggers.
//!
//! # Example
//!
//! ```rust,no_run
//! use ringlog::{Level, LoggerBuilder};
//!
//! let logger = LoggerBuilder::new("app")
//!     .with_level(Level::Info)
//!     .with_buffer(500)
//!     .with_file("/var/log/app.log")
//!     .with_roll_count(5)
//!     .build()
//!     .expect("Failed to create logger");
//!
//! logger.info("listening on port %d", &[8080.into()]);
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use crate::console::Console;
use crate::registry::validate_name;
use crate::{ColorChoice, Error, Level, Logger, LoggerConfig, Registry, Result, RotationPolicy};

/// A builder for configuring and creating a [`Logger`].
pub struct LoggerBuilder {
    name: String,
    level: Level,
    buffer_size: usize,
    console: bool,
    color: ColorChoice,
    console_writer: Option<Box<dyn Write + Send>>,
    file: Option<PathBuf>,
    rotation: RotationPolicy,
}

impl LoggerBuilder {
    /// Create a new LoggerBuilder with default configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: Level::NotSet,
            buffer_size: 0,
            console: true,
            color: ColorChoice::Auto,
            console_writer: None,
            file: None,
            rotation: RotationPolicy::default(),
        }
    }

    /// Create a LoggerBuilder from an existing configuration.
    ///
    /// Fails if the configured level is not a known tier name.
    pub fn from_config(config: &LoggerConfig) -> Result<Self> {
        let mut builder = Self::new(config.name.clone())
            .with_buffer(config.buffer_size)
            .with_console(config.console)
            .with_color(config.color);

        if let Some(level) = &config.level {
            builder = builder.with_level(level.parse::<Level>()?);
        }
        if let Some(file) = &config.file {
            builder = builder.with_file(&file.path).with_rotation(file.rotation);
        }
        Ok(builder)
    }

    /// Set the minimum level.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Keep the newest `lines` lines in memory. 0 disables the buffer.
    pub fn with_buffer(mut self, lines: usize) -> Self {
        self.buffer_size = lines;
        self
    }

    /// Enable or disable console logging.
    pub fn with_console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    /// Set console coloring.
    pub fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Send console lines to `writer` instead of standard error.
    pub fn with_console_writer(mut self, writer: impl Write + Send + 'static) -> Self {
        self.console_writer = Some(Box::new(writer));
        self
    }

    /// Configure file logging with a path.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Set the rotation policy for file logging.
    pub fn with_rotation(mut self, rotation: RotationPolicy) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the rotation threshold in bytes.
    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.rotation.max_size = max_size;
        self
    }

    /// Set how many rotated backups to keep.
    pub fn with_roll_count(mut self, roll_count: usize) -> Self {
        self.rotation.roll_count = roll_count;
        self
    }

    /// Create the logger.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not acceptable. A file that cannot be
    /// opened is not an error: it is reported and file output stays off.
    pub fn build(self) -> Result<Logger> {
        validate_name(&self.name)?;
        if self.rotation.roll_count == 0 {
            return Err(Error::Config("roll_count must be at least 1".to_string()));
        }

        let console = match (self.console, self.console_writer) {
            (false, _) => Console::disabled(),
            (true, Some(writer)) => Console::writer(writer, self.color),
            (true, None) => Console::stderr(self.color),
        };

        let logger = Logger::from_parts(
            self.name,
            self.level,
            console,
            self.buffer_size,
            self.rotation,
        );
        if let Some(path) = self.file {
            logger.set_file(path);
        }
        Ok(logger)
    }

    /// Create the logger inside `registry`, or return the one already
    /// registered under this name. The first registration wins.
    pub fn register(self, registry: &Registry) -> Result<Arc<Logger>> {
        let name = self.name.clone();
        registry.get_or_insert_with(&name, || self.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FileLogConfig;

    #[test]
    fn test_builder_defaults() {
        let logger = LoggerBuilder::new("app").with_console(false).build().unwrap();
        assert_eq!(logger.name(), "app");
        assert_eq!(logger.level(), Level::NotSet);
        assert_eq!(logger.buffer_capacity(), 0);
        assert_eq!(logger.rotation(), RotationPolicy::default());
        assert!(logger.file_path().is_none());
    }

    #[test]
    fn test_builder_chaining() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let logger = LoggerBuilder::new("app")
            .with_console(false)
            .with_level(Level::Warn)
            .with_buffer(10)
            .with_file(&path)
            .with_max_size(2048)
            .with_roll_count(3)
            .build()
            .unwrap();

        assert_eq!(logger.level(), Level::Warn);
        assert_eq!(logger.buffer_capacity(), 10);
        assert_eq!(logger.rotation(), RotationPolicy::new(2048, 3));
        assert_eq!(logger.file_path(), Some(path));
        assert!(logger.is_file_open());
    }

    #[test]
    fn test_builder_from_config() {
        let config = LoggerConfig::new("svc")
            .with_level("ERROR")
            .with_buffer_size(7)
            .with_console(false);
        let logger = LoggerBuilder::from_config(&config).unwrap().build().unwrap();
        assert_eq!(logger.level(), Level::Error);
        assert_eq!(logger.buffer_capacity(), 7);
    }

    #[test]
    fn test_builder_from_config_with_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("svc.log");
        let config = LoggerConfig::new("svc")
            .with_console(false)
            .with_file(FileLogConfig::new(&path).with_rotation(RotationPolicy::new(64, 2)));
        let logger = LoggerBuilder::from_config(&config).unwrap().build().unwrap();
        assert_eq!(logger.file_path(), Some(path));
        assert_eq!(logger.rotation(), RotationPolicy::new(64, 2));
    }

    #[test]
    fn test_builder_from_config_unknown_level() {
        let config = LoggerConfig::new("svc").with_level("LOUD");
        assert!(matches!(
            LoggerBuilder::from_config(&config),
            Err(Error::UnknownLevel(_))
        ));
    }

    #[test]
    fn test_builder_rejects_bad_name() {
        assert!(matches!(
            LoggerBuilder::new("  ").build(),
            Err(Error::InvalidName(_))
        ));
    }

    #[test]
    fn test_builder_rejects_zero_roll_count() {
        assert!(matches!(
            LoggerBuilder::new("x").with_roll_count(0).build(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_builder_register_first_wins() {
        let registry = Registry::new();
        let first = LoggerBuilder::new("shared")
            .with_console(false)
            .with_buffer(3)
            .register(&registry)
            .unwrap();
        let second = LoggerBuilder::new("shared")
            .with_console(false)
            .with_buffer(99)
            .register(&registry)
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.buffer_capacity(), 3);
    }
}
