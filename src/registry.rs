//! Name to logger lookup.
//!
//! A [`Registry`] hands out one shared [`Logger`] per name: the first lookup
//! creates it and every later lookup returns the same instance. Applications
//! can own a registry and pass it around, or use the process-wide one from
//! [`global`], which is created on first use and lives until the process
//! exits. [`Registry::clear`] drops every registered logger.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;

use crate::console::Console;
use crate::{
    ColorChoice, Error, Level, Logger, LoggerBuilder, LoggerConfig, Result, RotationPolicy,
};

/// Name used when a default logger has to be created.
pub const DEFAULT_LOGGER_NAME: &str = "default";

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::new);

/// The process-wide registry.
pub fn global() -> &'static Registry {
    &GLOBAL
}

/// Reject names that cannot identify a logger.
pub(crate) fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() || name.chars().any(char::is_control) {
        return Err(Error::InvalidName(name.to_string()));
    }
    Ok(())
}

#[derive(Debug, Default)]
struct Entries {
    loggers: HashMap<String, Arc<Logger>>,
    /// Most recently created logger.
    newest: Option<Arc<Logger>>,
}

/// A set of loggers keyed by name.
#[derive(Debug, Default)]
pub struct Registry {
    entries: Mutex<Entries>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The logger called `name`, created with default settings if it does not exist yet.
    pub fn logger(&self, name: &str) -> Result<Arc<Logger>> {
        self.get_or_insert_with(name, || LoggerBuilder::new(name).build())
    }

    /// The logger named in `config`, created from `config` if it does not
    /// exist yet. An existing logger is returned unchanged.
    pub fn logger_with(&self, config: &LoggerConfig) -> Result<Arc<Logger>> {
        self.get_or_insert_with(&config.name, || LoggerBuilder::from_config(config)?.build())
    }

    pub(crate) fn get_or_insert_with<F>(&self, name: &str, create: F) -> Result<Arc<Logger>>
    where
        F: FnOnce() -> Result<Logger>,
    {
        validate_name(name)?;

        let mut entries = self.lock();
        if let Some(logger) = entries.loggers.get(name) {
            return Ok(Arc::clone(logger));
        }

        let logger = Arc::new(create()?);
        entries
            .loggers
            .insert(name.to_string(), Arc::clone(&logger));
        entries.newest = Some(Arc::clone(&logger));
        Ok(logger)
    }

    /// The logger called `name`, if registered.
    pub fn get(&self, name: &str) -> Option<Arc<Logger>> {
        self.lock().loggers.get(name).cloned()
    }

    /// The most recently created logger, or a new one called `default` if
    /// the registry is empty.
    pub fn default_logger(&self) -> Arc<Logger> {
        let mut entries = self.lock();
        if let Some(logger) = &entries.newest {
            return Arc::clone(logger);
        }
        if let Some(logger) = entries.loggers.get(DEFAULT_LOGGER_NAME) {
            return Arc::clone(logger);
        }

        let logger = Arc::new(Logger::from_parts(
            DEFAULT_LOGGER_NAME.to_string(),
            Level::NotSet,
            Console::stderr(ColorChoice::Auto),
            0,
            RotationPolicy::default(),
        ));
        entries
            .loggers
            .insert(DEFAULT_LOGGER_NAME.to_string(), Arc::clone(&logger));
        entries.newest = Some(Arc::clone(&logger));
        logger
    }

    /// Remove the logger called `name`. Handles already given out keep working.
    pub fn remove(&self, name: &str) -> Option<Arc<Logger>> {
        let mut entries = self.lock();
        let removed = entries.loggers.remove(name)?;
        if entries
            .newest
            .as_ref()
            .is_some_and(|newest| Arc::ptr_eq(newest, &removed))
        {
            entries.newest = None;
        }
        Some(removed)
    }

    /// Names of all registered loggers, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().loggers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Drop every registered logger.
    pub fn clear(&self) {
        let mut entries = self.lock();
        entries.loggers.clear();
        entries.newest = None;
    }
}
