//! Implementation loader: alias → sub-command factory
//!
//! Sub-commands register a factory under their alias at startup. Adding a
//! sub-command never touches the dispatcher.

use std::collections::BTreeMap;
use std::fmt;

use crate::context::RunContext;
use crate::error::{SuiteError, SuiteResult};

/// A sub-command implementation, constructed with the full argument vector.
pub trait Subcommand {
    /// Run to completion; the returned value becomes the exit code.
    fn run(&mut self, ctx: &RunContext<'_>) -> SuiteResult<i32>;

    /// Verbosity from the parsed options, `None` until options are parsed.
    fn verbosity(&self) -> Option<u8> {
        None
    }

    /// Print usage, used before reporting an options error.
    fn print_help(&self) {}
}

pub type Factory = Box<dyn Fn(Vec<String>) -> Box<dyn Subcommand>>;

/// Conventional implementation name for an alias: `widget` → `WidgetCli`.
pub fn implementation_name(alias: &str) -> String {
    let mut chars = alias.chars();
    let capitalized: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    };
    format!("{capitalized}Cli")
}

/// Resolved entry point for one alias.
pub struct ImplementationHandle<'r> {
    alias: String,
    name: String,
    factory: &'r Factory,
}

impl<'r> ImplementationHandle<'r> {
    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn construct(&self, args: Vec<String>) -> Box<dyn Subcommand> {
        (self.factory)(args)
    }
}

impl fmt::Debug for ImplementationHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImplementationHandle")
            .field("alias", &self.alias)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// All sub-commands known to this executable.
#[derive(Default)]
pub struct Registry {
    entries: BTreeMap<String, Factory>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under `alias`, replacing any earlier entry.
    pub fn register<F>(&mut self, alias: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(Vec<String>) -> Box<dyn Subcommand> + 'static,
    {
        self.entries.insert(alias.into(), Box::new(factory));
        self
    }

    /// Builder-style [`Registry::register`].
    pub fn with<F>(mut self, alias: impl Into<String>, factory: F) -> Self
    where
        F: Fn(Vec<String>) -> Box<dyn Subcommand> + 'static,
    {
        self.register(alias, factory);
        self
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.entries.contains_key(alias)
    }

    /// Registered aliases, sorted.
    pub fn aliases(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Look up the implementation for `alias`.
    ///
    /// `basename` is only used for the error message.
    pub fn load(&self, alias: &str, basename: &str) -> SuiteResult<ImplementationHandle<'_>> {
        match self.entries.get(alias) {
            Some(factory) => Ok(ImplementationHandle {
                alias: alias.to_string(),
                name: implementation_name(alias),
                factory,
            }),
            None => Err(SuiteError::NotImplemented {
                alias: alias.to_string(),
                basename: basename.to_string(),
            }),
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.keys()).finish()
    }
}
