use ringlog::{LoggerConfig, Registry};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempfile::tempdir()?;
    let yaml = format!(
        r#"
name: service
level: INFO
buffer_size: 100
color: never
file:
  path: {}
  rotation:
    max_size: "64K"
    roll_count: 3
"#,
        temp_dir.path().join("service.log").display()
    );

    let config: LoggerConfig = serde_yaml::from_str(&yaml)?;
    println!("Loaded config: {config:?}");

    let registry = Registry::new();
    let logger = registry.logger_with(&config)?;

    ringlog::debug!(logger, "filtered out");
    ringlog::info!(logger, "service %s ready", "api");

    println!("{}", logger.recent_lines_json(10));
    Ok(())
}
