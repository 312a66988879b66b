use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::RotationPolicy;
use crate::rotation;

/// An append-only log file that rotates itself once it grows past a threshold.
///
/// The sink is not synchronized; the owning logger serializes access.
#[derive(Debug)]
pub struct FileSink {
    /// Path of the active log file.
    path: PathBuf,
    /// Rotation threshold and backup depth.
    policy: RotationPolicy,
    /// Open handle, `None` once an open or rotation has failed.
    file: Option<File>,
    /// Bytes written to the active file since it was opened or rotated.
    size: u64,
}

impl FileSink {
    /// Open `path` for appending.
    ///
    /// A file that is already larger than the threshold is rotated first, and
    /// the fresh file starts empty. Otherwise writing continues after the
    /// existing content and the byte count starts at its size.
    pub fn open(path: &Path, policy: RotationPolicy) -> io::Result<Self> {
        // Ensure parent directory exists (create if necessary) so a path like
        // `logs/app.log` works before `logs/` has been created.
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let mut sink = Self {
            path: path.to_path_buf(),
            policy,
            file: None,
            size: 0,
        };

        let existing = match std::fs::metadata(path) {
            Ok(metadata) if metadata.is_file() => Some(metadata.len()),
            _ => None,
        };

        match existing {
            Some(len) if policy.exceeded(len) => {
                rotation::rotate(&sink.path, policy.roll_count)?;
                sink.reopen(true)?;
            }
            Some(len) => {
                sink.reopen(false)?;
                sink.size = len;
            }
            None => sink.reopen(false)?,
        }

        Ok(sink)
    }

    /// Path of the active log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current rotation settings.
    pub fn policy(&self) -> RotationPolicy {
        self.policy
    }

    /// Change the rotation settings. The new threshold applies from the next write.
    pub fn set_policy(&mut self, policy: RotationPolicy) {
        self.policy = policy;
    }

    /// Bytes written to the active file since it was opened or rotated.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// True while the sink holds an open handle.
    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Append `bytes`, flush, and rotate if the file has now outgrown the threshold.
    ///
    /// Writes are silently skipped once the handle has been lost. A failed
    /// flush is ignored. A failed rotation leaves the sink closed and is
    /// returned to the caller.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        let Some(file) = self.file.as_mut() else {
            return Ok(());
        };

        file.write_all(bytes)?;
        let _ = file.flush();
        self.size += bytes.len() as u64;

        if self.policy.exceeded(self.size) {
            self.rotate()?;
        }
        Ok(())
    }

    /// Close the active file, shift the backups and start a new empty file.
    pub fn rotate(&mut self) -> io::Result<()> {
        self.file = None;
        rotation::rotate(&self.path, self.policy.roll_count)?;
        self.reopen(true)
    }

    fn reopen(&mut self, truncate: bool) -> io::Result<()> {
        let mut options = OpenOptions::new();
        options.create(true);
        if truncate {
            options.write(true).truncate(true);
        } else {
            options.append(true);
        }

        self.file = Some(options.open(&self.path)?);
        self.size = 0;
        Ok(())
    }
}

impl Write for FileSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::backup_path;

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_file_sink_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("test.log");

        let mut sink = FileSink::open(&log_path, RotationPolicy::default()).unwrap();
        sink.write_all(b"hello world\n").unwrap();

        assert!(sink.is_open());
        assert_eq!(sink.size(), 12);
        assert_eq!(read(&log_path), "hello world\n");
    }

    #[test]
    fn test_file_sink_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested/inner");
        let log_path = nested.join("test.log");
        assert!(!nested.exists());

        let mut sink = FileSink::open(&log_path, RotationPolicy::default()).unwrap();
        sink.write_bytes(b"hello parent\n").unwrap();

        assert!(nested.exists(), "Parent directories should have been created");
        assert_eq!(read(&log_path), "hello parent\n");
    }

    #[test]
    fn test_file_sink_reuses_small_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("test.log");
        std::fs::write(&log_path, "existing content\n").unwrap();

        let mut sink = FileSink::open(&log_path, RotationPolicy::new(100, 5)).unwrap();
        assert_eq!(sink.size(), 17);
        sink.write_bytes(b"new content\n").unwrap();

        assert_eq!(read(&log_path), "existing content\nnew content\n");
        assert!(!backup_path(&log_path, 1).exists());
    }

    #[test]
    fn test_file_sink_rotates_oversized_file_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("test.log");
        std::fs::write(&log_path, "0123456789ABCDEF").unwrap();

        let sink = FileSink::open(&log_path, RotationPolicy::new(10, 2)).unwrap();

        assert_eq!(sink.size(), 0);
        assert_eq!(read(&log_path), "");
        assert_eq!(read(&backup_path(&log_path, 1)), "0123456789ABCDEF");
    }

    #[test]
    fn test_file_sink_threshold_is_inclusive() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("test.log");
        let mut sink = FileSink::open(&log_path, RotationPolicy::new(10, 2)).unwrap();

        sink.write_bytes(b"12345").unwrap();
        sink.write_bytes(b"67890").unwrap();
        assert_eq!(sink.size(), 10);
        assert!(!backup_path(&log_path, 1).exists());

        sink.write_bytes(b"X").unwrap();
        assert_eq!(sink.size(), 0);
        assert_eq!(read(&backup_path(&log_path, 1)), "1234567890X");
        assert_eq!(read(&log_path), "");

        sink.write_bytes(b"next").unwrap();
        assert_eq!(read(&log_path), "next");
        assert!(!backup_path(&log_path, 2).exists());
    }

    #[test]
    fn test_file_sink_keeps_roll_count_backups() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("test.log");
        let mut sink = FileSink::open(&log_path, RotationPolicy::new(3, 3)).unwrap();

        for round in 1..=4 {
            sink.write_bytes(format!("gen{round}").as_bytes()).unwrap();
        }

        assert_eq!(read(&backup_path(&log_path, 1)), "gen4");
        assert_eq!(read(&backup_path(&log_path, 2)), "gen3");
        assert_eq!(read(&backup_path(&log_path, 3)), "gen2");
        assert!(!backup_path(&log_path, 4).exists());
        assert_eq!(read(&log_path), "");
    }

    #[test]
    fn test_file_sink_policy_change_applies_to_next_write() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("test.log");
        let mut sink = FileSink::open(&log_path, RotationPolicy::default()).unwrap();

        sink.write_bytes(b"0123456789").unwrap();
        sink.set_policy(RotationPolicy::new(5, 1));
        assert_eq!(sink.policy().max_size, 5);
        sink.write_bytes(b"!").unwrap();

        assert_eq!(read(&backup_path(&log_path, 1)), "0123456789!");
    }

    #[test]
    fn test_file_sink_failed_rotation_closes_handle() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("test.log");
        let blocked = backup_path(&log_path, 1);
        std::fs::create_dir(&blocked).unwrap();
        std::fs::write(blocked.join("keep"), "x").unwrap();

        let mut sink = FileSink::open(&log_path, RotationPolicy::new(4, 1)).unwrap();
        assert!(sink.write_bytes(b"too long").is_err());
        assert!(!sink.is_open());

        // Later writes are dropped without an error.
        sink.write_bytes(b"lost").unwrap();
        assert_eq!(read(&log_path), "too long");
    }
}
