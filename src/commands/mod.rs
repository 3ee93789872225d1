//! Built-in sub-commands shipped with the `tool` executable

pub mod config_cli;
pub mod main_cli;

use clap::error::ErrorKind;
use clap::Parser;

use crate::alias::DEFAULT_ALIAS;
use crate::error::{SuiteError, SuiteResult};
use crate::registry::Registry;

pub use config_cli::ConfigCli;
pub use main_cli::MainCli;

/// Registry with every built-in sub-command.
pub fn builtin_registry() -> Registry {
    Registry::new()
        .with(DEFAULT_ALIAS, |args| Box::new(MainCli::new(args)))
        .with("config", |args| Box::new(ConfigCli::new(args)))
}

/// Parse `args` (including `argv[0]`) with clap.
///
/// Returns `None` when clap already printed help or version output.
/// Other clap errors become options errors.
pub(crate) fn parse_args<P: Parser>(args: &[String]) -> SuiteResult<Option<P>> {
    match P::try_parse_from(args) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.print().ok();
            Ok(None)
        }
        Err(e) => Err(SuiteError::options(clap_message(&e))),
    }
}

/// First line of a clap error, without the `error: ` prefix.
fn clap_message(e: &clap::Error) -> String {
    let rendered = e.to_string();
    rendered
        .lines()
        .next()
        .unwrap_or_default()
        .trim_start_matches("error: ")
        .to_string()
}
