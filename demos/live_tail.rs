use std::sync::Arc;
use std::thread;
use std::time::Duration;

use ringlog::{Level, Registry};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let registry = Registry::new();
    let logger = ringlog::LoggerBuilder::new("worker")
        .with_console(false)
        .with_buffer(20)
        .register(&registry)?;

    let producer = {
        let logger = Arc::clone(&logger);
        thread::spawn(move || {
            for job in 0..50 {
                let level = if job % 10 == 9 { Level::Warn } else { Level::Info };
                ringlog::log!(logger, level, "job %d finished in %.1f ms", job, job as f64 * 1.5);
                thread::sleep(Duration::from_millis(5));
            }
        })
    };

    // Poll like a dashboard would, asking only for lines it has not seen.
    let mut next = 1;
    while !producer.is_finished() || next <= logger.last_seq() {
        let json = registry
            .get("worker")
            .map(|l| l.lines_since_json(next))
            .unwrap_or_else(|| "{}".to_string());
        if json != "{}" {
            println!("{json}");
        }
        next = logger.last_seq() + 1;
        thread::sleep(Duration::from_millis(20));
    }

    producer.join().map_err(|_| "producer panicked")?;
    Ok(())
}
