use ringlog::{LoggerBuilder, RotationPolicy};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempfile::tempdir()?;
    let log_path = temp_dir.path().join("test.log");

    let logger = LoggerBuilder::new("rotation")
        .with_console(false)
        .with_file(&log_path)
        .with_rotation(RotationPolicy::new(1024, 5)) // 1KB, keep 5 backups
        .build()?;

    for i in 0..100 {
        ringlog::info!(logger, "Log message number %d", i);
    }

    let mut names: Vec<String> = std::fs::read_dir(temp_dir.path())?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    for name in names {
        println!("{name}");
    }

    Ok(())
}
