// Environment: where the runner's advertised settings are read from.
// Injected into CommandChannel so tests can run without touching the process.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::ffi::{OsStr, OsString};

use crate::error::{CommandError, Result};

/// Read/write access to environment variables.
///
/// Every protocol operation reads through this trait on each call; nothing is
/// cached, so changing a variable between calls changes the next call only.
///
/// Values are raw `OsString`s. Paths and PATH lists are not required to be
/// valid UTF-8 and must survive a read-modify-write unchanged.
pub trait Environment: Send + Sync {
    /// Raw value of `name`, or `None` when unset.
    fn var_os(&self, name: &str) -> Option<OsString>;

    /// Set `name` for the remainder of the current process.
    fn set_var(&self, name: &str, value: &OsStr) -> Result<()>;

    /// Value of `name` as text. Invalid UTF-8 is replaced, not dropped.
    fn var(&self, name: &str) -> Option<String> {
        self.var_os(name)
            .map(|value| value.to_string_lossy().into_owned())
    }

    /// Value of `name` when it is set and non-empty.
    fn non_empty_var(&self, name: &str) -> Option<String> {
        self.var(name).filter(|value| !value.is_empty())
    }

    /// Raw value of `name` when it is set and non-empty.
    fn non_empty_var_os(&self, name: &str) -> Option<OsString> {
        self.var_os(name).filter(|value| !value.is_empty())
    }
}

/// Reject names and values the OS cannot store.
pub fn validate_var(name: &str, value: &OsStr) -> Result<()> {
    if name.is_empty() || name.contains(&['=', '\0'][..]) {
        return Err(CommandError::Configuration(format!(
            "Invalid environment variable name '{name}'"
        )));
    }
    if value.as_encoded_bytes().contains(&0) {
        return Err(CommandError::Configuration(format!(
            "Value of environment variable '{name}' contains a NUL byte"
        )));
    }
    Ok(())
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var_os(&self, name: &str) -> Option<OsString> {
        std::env::var_os(name)
    }

    fn set_var(&self, name: &str, value: &OsStr) -> Result<()> {
        // std::env::set_var panics on what validate_var rejects.
        validate_var(name, value)?;
        std::env::set_var(name, value);
        Ok(())
    }
}

/// An in-memory environment.
#[derive(Debug, Default)]
pub struct MapEnvironment {
    vars: RwLock<HashMap<String, OsString>>,
}

impl MapEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(self, name: impl Into<String>, value: impl Into<OsString>) -> Self {
        self.vars.write().insert(name.into(), value.into());
        self
    }

    pub fn remove_var(&self, name: &str) {
        self.vars.write().remove(name);
    }
}

impl Environment for MapEnvironment {
    fn var_os(&self, name: &str) -> Option<OsString> {
        self.vars.read().get(name).cloned()
    }

    fn set_var(&self, name: &str, value: &OsStr) -> Result<()> {
        validate_var(name, value)?;
        self.vars.write().insert(name.to_string(), value.to_os_string());
        Ok(())
    }
}
