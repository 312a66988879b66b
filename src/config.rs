use serde::{Deserialize, Serialize};

use crate::{ColorChoice, RotationPolicy};

/// Configuration for one logger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Logger name, fixed once the logger exists
    pub name: String,
    /// Minimum level by tier name (e.g., "INFO"); unset admits everything
    #[serde(default)]
    pub level: Option<String>,
    /// Number of recent lines kept in memory; 0 disables the buffer
    #[serde(default)]
    pub buffer_size: usize,
    /// Enable console logging
    #[serde(default = "default_console")]
    pub console: bool,
    /// Console coloring
    #[serde(default)]
    pub color: ColorChoice,
    /// File logging configuration
    #[serde(default)]
    pub file: Option<FileLogConfig>,
}

impl LoggerConfig {
    /// Create a new LoggerConfig with defaults
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: None,
            buffer_size: 0,
            console: default_console(),
            color: ColorChoice::default(),
            file: None,
        }
    }

    /// Set log level
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// Set buffer size
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Enable console logging
    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }

    /// Set console coloring
    pub fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Set file logging configuration
    pub fn with_file(mut self, file: FileLogConfig) -> Self {
        self.file = Some(file);
        self
    }
}

fn default_console() -> bool {
    true
}

/// Configuration for file logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileLogConfig {
    /// Path to the log file
    pub path: std::path::PathBuf,
    /// Size-based rotation settings
    #[serde(default)]
    pub rotation: RotationPolicy,
}

impl FileLogConfig {
    /// Create a new FileLogConfig
    pub fn new<P: Into<std::path::PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            rotation: RotationPolicy::default(),
        }
    }

    /// Set rotation policy
    pub fn with_rotation(mut self, rotation: RotationPolicy) -> Self {
        self.rotation = rotation;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_logger_config_new() {
        let config = LoggerConfig::new("app");
        assert_eq!(config.name, "app");
        assert!(config.level.is_none());
        assert_eq!(config.buffer_size, 0);
        assert!(config.console);
        assert_eq!(config.color, ColorChoice::Auto);
        assert!(config.file.is_none());
    }

    #[test]
    fn test_logger_config_chaining() {
        let config = LoggerConfig::new("app")
            .with_level("WARN")
            .with_buffer_size(200)
            .with_console(false)
            .with_color(ColorChoice::Never)
            .with_file(FileLogConfig::new("app.log"));
        assert_eq!(config.level.as_deref(), Some("WARN"));
        assert_eq!(config.buffer_size, 200);
        assert!(!config.console);
        assert_eq!(config.color, ColorChoice::Never);
        assert_eq!(config.file.unwrap().path, PathBuf::from("app.log"));
    }

    #[test]
    fn test_file_log_config_with_rotation() {
        let config = FileLogConfig::new("test.log").with_rotation(RotationPolicy::new(1024, 5));
        assert_eq!(config.path, PathBuf::from("test.log"));
        assert_eq!(config.rotation, RotationPolicy::new(1024, 5));
    }

    #[test]
    fn test_logger_config_from_yaml() {
        let yaml = r#"
name: web
level: INFO
buffer_size: 500
color: never
file:
  path: /var/log/web.log
  rotation:
    max_size: "10M"
    roll_count: 4
"#;
        let config: LoggerConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.name, "web");
        assert_eq!(config.level.as_deref(), Some("INFO"));
        assert_eq!(config.buffer_size, 500);
        assert!(config.console);
        assert_eq!(config.color, ColorChoice::Never);
        let file = config.file.unwrap();
        assert_eq!(file.path, PathBuf::from("/var/log/web.log"));
        assert_eq!(file.rotation, RotationPolicy::new(10 * 1024 * 1024, 4));
    }

    #[test]
    fn test_logger_config_from_toml() {
        let toml_str = r#"
name = "worker"
console = false

[file]
path = "worker.log"
"#;
        let config: LoggerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.name, "worker");
        assert!(!config.console);
        assert_eq!(config.color, ColorChoice::Auto);
        assert_eq!(config.file.unwrap().rotation, RotationPolicy::default());
    }

    #[test]
    fn test_logger_config_rejects_bad_color() {
        let yaml = "name: x\ncolor: rainbow\n";
        assert!(serde_yaml::from_str::<LoggerConfig>(yaml).is_err());
    }
}
