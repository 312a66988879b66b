use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize, de};

/// Default rotation threshold: 1 MiB.
pub const DEFAULT_MAX_SIZE: u64 = 1024 * 1024;

/// Default number of rotated backups to keep.
pub const DEFAULT_ROLL_COUNT: usize = 1;

/// Parse a size string with an optional unit (B/K/M/G, case-insensitive).
/// A bare number is a byte count.
fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    let Some(last) = s.chars().last() else {
        return Err("empty size string".to_string());
    };

    let (num_str, unit) = if last.is_alphabetic() {
        (&s[..s.len() - last.len_utf8()], last.to_ascii_uppercase())
    } else {
        (s, 'B')
    };

    let num: u64 = num_str
        .trim()
        .parse()
        .map_err(|_| format!("invalid number: {}", num_str))?;

    let multiplier = match unit {
        'B' => 1,
        'K' => 1024,
        'M' => 1024 * 1024,
        'G' => 1024 * 1024 * 1024,
        _ => return Err(format!("invalid unit: {}, supported: B/K/M/G", unit)),
    };

    num.checked_mul(multiplier)
        .ok_or_else(|| "size too large".to_string())
}

/// Size value that can be a number or string with units.
#[derive(Deserialize)]
#[serde(untagged)]
enum SizeValue {
    Number(u64),
    String(String),
}

impl SizeValue {
    fn to_bytes(&self) -> Result<u64, String> {
        match self {
            SizeValue::Number(n) => Ok(*n),
            SizeValue::String(s) => parse_size(s),
        }
    }
}

/// Size-triggered rotation settings for a log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RotationPolicy {
    /// Rotate once the active file grows beyond this many bytes.
    pub max_size: u64,
    /// Number of rotated backups to keep (`file.1` .. `file.N`).
    pub roll_count: usize,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            roll_count: DEFAULT_ROLL_COUNT,
        }
    }
}

impl<'de> Deserialize<'de> for RotationPolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RotationInput {
            max_size: Option<SizeValue>,
            roll_count: Option<usize>,
        }

        let input = RotationInput::deserialize(deserializer)?;

        let max_size = match input.max_size {
            Some(size) => size.to_bytes().map_err(de::Error::custom)?,
            None => DEFAULT_MAX_SIZE,
        };
        let roll_count = input.roll_count.unwrap_or(DEFAULT_ROLL_COUNT);
        if roll_count == 0 {
            return Err(de::Error::custom("roll_count must be at least 1"));
        }

        Ok(RotationPolicy {
            max_size,
            roll_count,
        })
    }
}

impl RotationPolicy {
    /// Create a rotation policy.
    pub fn new(max_size: u64, roll_count: usize) -> Self {
        Self {
            max_size,
            roll_count,
        }
    }

    /// True once `size` bytes exceed the threshold.
    pub fn exceeded(&self, size: u64) -> bool {
        size > self.max_size
    }
}

/// Path of the `index`-th backup of `base` (`app.log` -> `app.log.3`).
pub fn backup_path(base: &Path, index: usize) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(format!(".{}", index));
    PathBuf::from(name)
}

/// Shift the backup ring of `base` by one and move `base` itself to `base.1`.
///
/// `base.(N-1)` becomes `base.N`, replacing whatever was there, so the
/// oldest backup falls off once the ring is full. Missing backups are
/// skipped, as is a missing base file. A `roll_count` of 0 or 1 keeps a
/// single backup that is replaced on every rotation.
pub fn rotate(base: &Path, roll_count: usize) -> io::Result<()> {
    for i in (2..=roll_count).rev() {
        let from = backup_path(base, i - 1);
        if !from.is_file() {
            continue;
        }
        std::fs::rename(&from, backup_path(base, i))?;
    }

    if base.is_file() {
        std::fs::rename(base, backup_path(base, 1))?;
    }
    Ok(())
}
