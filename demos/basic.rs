use ringlog::{ColorChoice, Level, LoggerBuilder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logger = LoggerBuilder::new("basic")
        .with_level(Level::Debug)
        .with_color(ColorChoice::Auto)
        .build()?;

    ringlog::debug!(logger, "debug");
    ringlog::info!(logger, "info");
    ringlog::warn!(logger, "warning");
    ringlog::error!(logger, "error");
    ringlog::critical!(logger, "critical");

    // A template that does not match its arguments is reported, not raised.
    ringlog::info!(logger, "%s and %s", "only one");

    Ok(())
}
