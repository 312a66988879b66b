use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Severity tiers, ordered from least to most severe.
///
/// `NotSet` is only meaningful as a logger threshold: it admits every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum Level {
    /// Admits everything.
    #[default]
    NotSet = 0,
    /// Verbose diagnostic information.
    Debug = 10,
    /// General informational messages.
    Info = 20,
    /// Something unexpected that the program can recover from.
    Warn = 30,
    /// An operation failed.
    Error = 40,
    /// The program may not be able to continue.
    Critical = 50,
}

impl Level {
    /// Numeric value of the tier.
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Tag used in console, file and buffer lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::NotSet => "NOTSET",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }

    /// Map a stored threshold back to its tier. Values between tiers round down.
    pub(crate) fn from_value(value: u8) -> Self {
        match value {
            50.. => Level::Critical,
            40..=49 => Level::Error,
            30..=39 => Level::Warn,
            20..=29 => Level::Info,
            10..=19 => Level::Debug,
            _ => Level::NotSet,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    /// Exact, case-sensitive match on the tier names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "WARN" | "WARNING" => Ok(Level::Warn),
            "ERROR" => Ok(Level::Error),
            "CRITICAL" | "FATAL" => Ok(Level::Critical),
            other => Err(Error::UnknownLevel(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::NotSet < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
        assert!(Level::Error < Level::Critical);
        assert_eq!(Level::Critical.value(), 50);
    }

    #[test]
    fn test_level_from_str() {
        assert_eq!("DEBUG".parse::<Level>().unwrap(), Level::Debug);
        assert_eq!("WARNING".parse::<Level>().unwrap(), Level::Warn);
        assert_eq!("FATAL".parse::<Level>().unwrap(), Level::Critical);
        assert!("debug".parse::<Level>().is_err());
        assert!("NOTSET".parse::<Level>().is_err());
        assert!(matches!(
            "verbose".parse::<Level>(),
            Err(Error::UnknownLevel(name)) if name == "verbose"
        ));
    }

    #[test]
    fn test_level_value_roundtrip() {
        for level in [
            Level::NotSet,
            Level::Debug,
            Level::Info,
            Level::Warn,
            Level::Error,
            Level::Critical,
        ] {
            assert_eq!(Level::from_value(level.value()), level);
        }
        assert_eq!(Level::from_value(35), Level::Warn);
    }
}
