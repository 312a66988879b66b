//! The logger: level filtering and synchronized dispatch to console, file and buffer.
//!
//! Every accepted call takes the logger's single mutex once and performs all
//! of its writes inside it, so the console, the file and the buffer observe
//! calls in the same order. Problems the logger runs into itself (a failed
//! rotation, a bad level name) are reported through `tracing` only after the
//! mutex has been released.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use time::OffsetDateTime;
use time::macros::format_description;

use crate::buffer::{self, LineBuffer, Lines};
use crate::console::Console;
use crate::format::{self, Arg, FormatError};
use crate::writer::FileSink;
use crate::{Level, Result, RotationPolicy};

/// Tag used for lines written by [`Logger::tofile`].
const FILE_ONLY_TAG: &str = "FILE";

/// How a message reaches the file.
enum FileLine<'a> {
    /// Timestamp, logger name and tag in front of the message.
    Prefixed(&'a str, &'a str),
    /// The text verbatim.
    Raw(&'a str),
}

/// Mutable state, only touched with the logger's mutex held.
#[derive(Debug)]
struct LoggerState {
    console: Console,
    buffer: LineBuffer,
    file: Option<FileSink>,
    rotation: RotationPolicy,
}

/// A named logger.
///
/// Loggers are usually created through [`crate::LoggerBuilder`] or a
/// [`crate::Registry`] and shared as `Arc<Logger>`.
#[derive(Debug)]
pub struct Logger {
    name: String,
    min_level: AtomicU8,
    state: Mutex<LoggerState>,
}

impl Logger {
    pub(crate) fn from_parts(
        name: String,
        level: Level,
        console: Console,
        buffer_capacity: usize,
        rotation: RotationPolicy,
    ) -> Self {
        Self {
            name,
            min_level: AtomicU8::new(level.value()),
            state: Mutex::new(LoggerState {
                console,
                buffer: LineBuffer::new(buffer_capacity),
                file: None,
                rotation,
            }),
        }
    }

    /// Start building a logger called `name`.
    pub fn builder(name: impl Into<String>) -> crate::LoggerBuilder {
        crate::LoggerBuilder::new(name)
    }

    /// The logger's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current minimum level.
    pub fn level(&self) -> Level {
        Level::from_value(self.min_level.load(Ordering::Relaxed))
    }

    /// Set the minimum level. Calls below it produce no output at all.
    pub fn set_level(&self, level: Level) {
        self.min_level.store(level.value(), Ordering::Relaxed);
    }

    /// Set the minimum level by tier name (`"DEBUG"`, `"INFO"`, `"WARN"`,
    /// `"ERROR"`, `"CRITICAL"`).
    ///
    /// An unrecognized name leaves the level unchanged and is reported as a
    /// warning.
    pub fn set_level_name(&self, name: &str) {
        match name.parse::<Level>() {
            Ok(level) => self.set_level(level),
            Err(e) => tracing::warn!(
                logger = %self.name,
                current = %self.level(),
                "{}; keeping the current level",
                e
            ),
        }
    }

    /// True if a call at `level` would produce output.
    pub fn is_enabled_for(&self, level: Level) -> bool {
        level >= self.level()
    }

    /// Log `template` with `args` substituted at `level`.
    ///
    /// Never fails: a template that does not match its arguments is recorded
    /// as a diagnostic line instead.
    pub fn log(&self, level: Level, template: &str, args: &[Arg]) {
        if !self.is_enabled_for(level) {
            return;
        }
        let rendered = format::render(template, args);
        self.dispatch(level, rendered, None);
    }

    /// Log an already rendered message at `level`, without substitution.
    pub fn emit(&self, level: Level, message: &str) {
        if !self.is_enabled_for(level) {
            return;
        }
        self.dispatch(level, Ok(message.to_string()), None);
    }

    pub fn debug(&self, template: &str, args: &[Arg]) {
        self.log(Level::Debug, template, args);
    }

    pub fn info(&self, template: &str, args: &[Arg]) {
        self.log(Level::Info, template, args);
    }

    pub fn warn(&self, template: &str, args: &[Arg]) {
        self.log(Level::Warn, template, args);
    }

    pub fn error(&self, template: &str, args: &[Arg]) {
        self.log(Level::Error, template, args);
    }

    pub fn critical(&self, template: &str, args: &[Arg]) {
        self.log(Level::Critical, template, args);
    }

    /// Log at ERROR, then dump `err` and its chain of sources verbatim to the file.
    ///
    /// The dump reaches the file even when ERROR is filtered out.
    pub fn exception(&self, template: &str, args: &[Arg], err: &dyn std::error::Error) {
        let mut dump = format!("Error: {err}\n");
        let mut source = err.source();
        while let Some(cause) = source {
            dump.push_str(&format!("Caused by: {cause}\n"));
            source = cause.source();
        }

        if !self.is_enabled_for(Level::Error) {
            let failure = self
                .lock()
                .write_file(&self.name, FileLine::Raw(&dump))
                .err();
            self.report_file_failure(failure);
            return;
        }

        let rendered = format::render(template, args);
        self.dispatch(Level::Error, rendered, Some(&dump));
    }

    /// Write one line to the file only. Not subject to the level filter.
    pub fn tofile(&self, template: &str, args: &[Arg]) {
        let message = match format::render(template, args) {
            Ok(message) => message,
            Err(e) => format_diagnostic(&e),
        };

        let failure = {
            let mut state = self.lock();
            state
                .write_file(&self.name, FileLine::Prefixed(FILE_ONLY_TAG, &message))
                .err()
        };
        self.report_file_failure(failure);
    }

    /// Write one accepted call to every sink under a single lock. `dump` is
    /// appended to the file verbatim after the call's own line.
    fn dispatch(
        &self,
        level: Level,
        rendered: std::result::Result<String, FormatError>,
        dump: Option<&str>,
    ) {
        let failure = {
            let mut state = self.lock();
            let written = match rendered {
                Ok(message) => {
                    state.console.write_line(level, &message);
                    let written = state
                        .write_file(&self.name, FileLine::Prefixed(level.as_str(), &message));
                    if state.buffer.capacity() > 0 {
                        let line = format!("{} [{}] {}", buffer_timestamp(), level, message);
                        state.buffer.append(line);
                    }
                    written
                }
                Err(e) => {
                    let diagnostic = format_diagnostic(&e);
                    state.console.write_line(level, &diagnostic);
                    if state.buffer.capacity() > 0 {
                        let line = format!("{} [{}] {}", buffer_timestamp(), level, diagnostic);
                        state.buffer.append(line);
                    }
                    Ok(())
                }
            };
            let written = match dump {
                Some(text) => written.and(state.write_file(&self.name, FileLine::Raw(text))),
                None => written,
            };
            written.err()
        };
        self.report_file_failure(failure);
    }

    fn report_file_failure(&self, failure: Option<io::Error>) {
        if let Some(e) = failure {
            tracing::warn!(logger = %self.name, error = %e, "failed to write log file");
        }
    }

    fn lock(&self) -> MutexGuard<'_, LoggerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Change how many lines the buffer retains. Shrinking drops the oldest
    /// lines immediately; 0 disables buffering.
    pub fn set_buffer(&self, capacity: usize) {
        self.lock().buffer.resize(capacity);
    }

    /// Maximum number of retained lines.
    pub fn buffer_capacity(&self) -> usize {
        self.lock().buffer.capacity()
    }

    /// Sequence number of the newest buffered line, 0 if none yet.
    pub fn last_seq(&self) -> u64 {
        self.lock().buffer.last_seq()
    }

    /// The newest `max_lines` buffered lines.
    pub fn recent_lines(&self, max_lines: usize) -> Lines {
        self.lock().buffer.get_range(max_lines)
    }

    /// Every buffered line numbered `from_seq` or later, starting at the
    /// oldest retained line if `from_seq` has already been evicted.
    pub fn lines_since(&self, from_seq: u64) -> Lines {
        self.lock().buffer.get_since(from_seq)
    }

    /// [`Logger::recent_lines`] as a JSON object keyed by decimal sequence numbers.
    pub fn recent_lines_json(&self, max_lines: usize) -> String {
        buffer::lines_to_json(&self.recent_lines(max_lines))
    }

    /// [`Logger::lines_since`] as a JSON object keyed by decimal sequence numbers.
    pub fn lines_since_json(&self, from_seq: u64) -> String {
        buffer::lines_to_json(&self.lines_since(from_seq))
    }

    /// Send file output to `path`, replacing any previous file.
    ///
    /// If the file cannot be opened the failure is reported and file output
    /// stays off until the next call.
    pub fn set_file(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        if let Err(e) = self.try_set_file(path) {
            tracing::warn!(
                logger = %self.name,
                path = %path.display(),
                error = %e,
                "failed to open log file"
            );
        }
    }

    /// Like [`Logger::set_file`], but hands the open failure back to the caller.
    ///
    /// The previous file is closed either way.
    pub fn try_set_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut state = self.lock();
        state.file = None;
        state.file = Some(FileSink::open(path.as_ref(), state.rotation)?);
        Ok(())
    }

    /// Stop writing to a file.
    pub fn clear_file(&self) {
        self.lock().file = None;
    }

    /// Change the rotation threshold and backup depth.
    pub fn set_rotation(&self, policy: RotationPolicy) {
        let mut state = self.lock();
        state.rotation = policy;
        if let Some(sink) = state.file.as_mut() {
            sink.set_policy(policy);
        }
    }

    /// Current rotation settings.
    pub fn rotation(&self) -> RotationPolicy {
        self.lock().rotation
    }

    /// Path of the active log file, if one is configured.
    pub fn file_path(&self) -> Option<PathBuf> {
        self.lock().file.as_ref().map(|sink| sink.path().to_path_buf())
    }

    /// True while file output is configured and its handle is usable.
    pub fn is_file_open(&self) -> bool {
        self.lock().file.as_ref().is_some_and(FileSink::is_open)
    }
}

impl LoggerState {
    fn write_file(&mut self, name: &str, line: FileLine<'_>) -> io::Result<()> {
        let Some(sink) = self.file.as_mut() else {
            return Ok(());
        };
        match line {
            FileLine::Prefixed(tag, message) => {
                let text = format!("{} [{}] [{}] {}\n", file_timestamp(), name, tag, message);
                sink.write_bytes(text.as_bytes())
            }
            FileLine::Raw(text) => sink.write_bytes(text.as_bytes()),
        }
    }
}

fn format_diagnostic(e: &FormatError) -> String {
    format!("LOG_EXCEPT: {}, Except: {}", e.template, e)
}

fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// `2026-01-09 14:03:07.042`
fn file_timestamp() -> String {
    now()
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]"
        ))
        .unwrap_or_default()
}

/// `Jan  9 14:03:07`
fn buffer_timestamp() -> String {
    now()
        .format(format_description!(
            "[month repr:short] [day padding:space] [hour]:[minute]:[second]"
        ))
        .unwrap_or_default()
}
