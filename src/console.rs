//! Console output with per-level coloring.

use std::fmt;
use std::io::{self, IsTerminal, Write};

use serde::{Deserialize, Serialize};

use crate::Level;

/// When to color console output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorChoice {
    /// Color only when the target is a terminal.
    #[default]
    Auto,
    /// Always color.
    Always,
    /// Never color.
    Never,
}

/// How level colors are applied to the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleColorizer {
    /// ANSI escape sequences written inline with the text.
    Ansi,
    /// Windows console text attributes on the standard error handle.
    WindowsConsole,
    /// Plain text.
    Noop,
}

impl ConsoleColorizer {
    /// Pick a colorizer for a stream, based on the user's choice and whether
    /// the stream is attached to a terminal.
    pub fn select(choice: ColorChoice, is_terminal: bool) -> Self {
        match choice {
            ColorChoice::Never => Self::Noop,
            ColorChoice::Auto if !is_terminal => Self::Noop,
            _ if cfg!(windows) && is_terminal => Self::WindowsConsole,
            _ => Self::Ansi,
        }
    }

    /// Switch to the color for `level`. INFO keeps the default color.
    pub fn apply(&self, out: &mut dyn Write, level: Level) {
        match self {
            Self::Ansi => {
                if let Some(code) = ansi_code(level) {
                    let _ = out.write_all(code.as_bytes());
                }
            }
            Self::WindowsConsole => {
                if let Some(attribute) = windows_attribute(level) {
                    let _ = out.flush();
                    set_console_attribute(attribute);
                }
            }
            Self::Noop => {}
        }
    }

    /// Return to the neutral color.
    pub fn reset(&self, out: &mut dyn Write) {
        match self {
            Self::Ansi => {
                let _ = out.write_all(ANSI_RESET.as_bytes());
            }
            Self::WindowsConsole => {
                let _ = out.flush();
                set_console_attribute(WINDOWS_RESET);
            }
            Self::Noop => {}
        }
    }
}

const ANSI_RESET: &str = "\x1b[0m";
const WINDOWS_RESET: u16 = 0x07;

fn ansi_code(level: Level) -> Option<&'static str> {
    match level {
        Level::Debug => Some("\x1b[32m"),
        Level::Warn => Some("\x1b[33m"),
        Level::Error | Level::Critical => Some("\x1b[31m"),
        Level::Info | Level::NotSet => None,
    }
}

fn windows_attribute(level: Level) -> Option<u16> {
    match level {
        Level::Debug => Some(0x02),
        Level::Warn => Some(0x06),
        Level::Error | Level::Critical => Some(0x04),
        Level::Info | Level::NotSet => None,
    }
}

#[cfg(windows)]
fn set_console_attribute(attribute: u16) {
    use windows_sys::Win32::System::Console::{
        GetStdHandle, STD_ERROR_HANDLE, SetConsoleTextAttribute,
    };

    unsafe {
        let handle = GetStdHandle(STD_ERROR_HANDLE);
        SetConsoleTextAttribute(handle, attribute);
    }
}

#[cfg(not(windows))]
fn set_console_attribute(_attribute: u16) {}

/// Where console lines go.
pub enum ConsoleTarget {
    /// The process's standard error stream.
    Stderr,
    /// Any writer, e.g. a capture buffer.
    Writer(Box<dyn Write + Send>),
    /// Console output is turned off.
    Disabled,
}

impl fmt::Debug for ConsoleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stderr => f.write_str("Stderr"),
            Self::Writer(_) => f.write_str("Writer(..)"),
            Self::Disabled => f.write_str("Disabled"),
        }
    }
}

/// The console half of a logger: a target plus a colorizer.
#[derive(Debug)]
pub struct Console {
    target: ConsoleTarget,
    colorizer: ConsoleColorizer,
}

impl Console {
    /// Console writing to standard error, colored per `choice`.
    pub fn stderr(choice: ColorChoice) -> Self {
        Self {
            target: ConsoleTarget::Stderr,
            colorizer: ConsoleColorizer::select(choice, io::stderr().is_terminal()),
        }
    }

    /// Console writing to a custom writer. `Auto` treats it as a non-terminal.
    pub fn writer(writer: Box<dyn Write + Send>, choice: ColorChoice) -> Self {
        let colorizer = match ConsoleColorizer::select(choice, false) {
            // Console attributes only make sense for the real console.
            ConsoleColorizer::WindowsConsole => ConsoleColorizer::Ansi,
            other => other,
        };
        Self {
            target: ConsoleTarget::Writer(writer),
            colorizer,
        }
    }

    /// Console that writes nothing.
    pub fn disabled() -> Self {
        Self {
            target: ConsoleTarget::Disabled,
            colorizer: ConsoleColorizer::Noop,
        }
    }

    /// The active colorizer.
    pub fn colorizer(&self) -> ConsoleColorizer {
        self.colorizer
    }

    /// Write `[LEVEL] message` followed by a newline, colored for `level`.
    ///
    /// Errors are ignored and the color is always reset afterwards.
    pub fn write_line(&mut self, level: Level, message: &str) {
        let line = format!("[{}] {}\n", level, message);
        let colorizer = self.colorizer;

        let mut stderr;
        let out: &mut dyn Write = match &mut self.target {
            ConsoleTarget::Stderr => {
                stderr = io::stderr().lock();
                &mut stderr
            }
            ConsoleTarget::Writer(writer) => writer.as_mut(),
            ConsoleTarget::Disabled => return,
        };

        colorizer.apply(out, level);
        let _ = out.write_all(line.as_bytes());
        colorizer.reset(out);
        let _ = out.flush();
    }
}
