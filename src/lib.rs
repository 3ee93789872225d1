//! Multi-call tool dispatcher
//!
//! One executable installed under many names. The invocation basename picks
//! the sub-command (`tool-config` → `config`, `tool` → the default), the
//! [`registry::Registry`] supplies its implementation, and the
//! [`dispatcher::Dispatcher`] runs it and turns every failure into a stable
//! exit code.

pub mod alias;
pub mod commands;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod display;
pub mod environment;
pub mod error;
pub mod exitcode;
pub mod locale;
pub mod logging;
pub mod registry;
pub mod runtime;
pub mod trace;
pub mod util;

pub use alias::{resolve_alias, Invocation, DEFAULT_ALIAS, PRIMARY_NAME};
pub use dispatcher::Dispatcher;
pub use error::{SuiteError, SuiteResult};
pub use registry::{Registry, Subcommand};
