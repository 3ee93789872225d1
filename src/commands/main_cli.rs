//! Default sub-command for the bare `tool` invocation

use clap::{ArgAction, CommandFactory, Parser};
use colored::Colorize;

use super::parse_args;
use crate::alias::{DEFAULT_ALIAS, PRIMARY_NAME};
use crate::context::RunContext;
use crate::error::SuiteResult;
use crate::exitcode;
use crate::registry::Subcommand;

/// Multi-call tool suite: invoke as tool-<name> to run a sub-command
#[derive(Parser, Debug)]
#[command(name = "tool")]
#[command(version, about, long_about = None)]
pub struct MainArgs {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Executable name a sub-command is invoked under.
pub fn invocation_name(alias: &str) -> String {
    if alias == DEFAULT_ALIAS {
        PRIMARY_NAME.to_string()
    } else {
        format!("{PRIMARY_NAME}-{alias}")
    }
}

pub struct MainCli {
    args: Vec<String>,
    options: Option<MainArgs>,
}

impl MainCli {
    pub fn new(args: Vec<String>) -> Self {
        Self {
            args,
            options: None,
        }
    }
}

impl Subcommand for MainCli {
    fn run(&mut self, ctx: &RunContext<'_>) -> SuiteResult<i32> {
        let Some(options) = parse_args::<MainArgs>(&self.args)? else {
            return Ok(exitcode::OK);
        };
        ctx.diagnostics.set_verbosity(options.verbose);

        println!("{}", "Available sub-commands:".cyan().bold());
        for alias in &ctx.aliases {
            let marker = if alias == DEFAULT_ALIAS { " (default)" } else { "" };
            println!("  {}{}", invocation_name(alias), marker);
        }

        if options.verbose > 0 {
            println!();
            println!("state dir: {}", ctx.settings.state_dir.display());
            match &ctx.settings.source {
                Some(path) => println!("config file: {}", path.display()),
                None => println!("config file: (none, using defaults)"),
            }
        }

        self.options = Some(options);
        Ok(exitcode::OK)
    }

    fn verbosity(&self) -> Option<u8> {
        self.options.as_ref().map(|o| o.verbose)
    }

    fn print_help(&self) {
        MainArgs::command().print_help().ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        MainArgs::command().debug_assert();
    }

    #[test]
    fn given_aliases_when_invocation_name_then_prefixed() {
        assert_eq!(invocation_name(DEFAULT_ALIAS), "tool");
        assert_eq!(invocation_name("config"), "tool-config");
    }

    #[test]
    fn given_vvv_when_parsed_then_verbosity_three() {
        let args: Vec<String> = vec!["tool".into(), "-vvv".into()];
        let parsed = parse_args::<MainArgs>(&args).unwrap().unwrap();
        assert_eq!(parsed.verbose, 3);
    }
}
