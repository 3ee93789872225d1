//! `tool-config`: inspect and initialize configuration

use std::path::PathBuf;

use clap::{ArgAction, CommandFactory, Parser};

use super::parse_args;
use crate::config::{config_search_paths, Settings, CONFIG_ENV_VAR};
use crate::context::RunContext;
use crate::error::{SuiteError, SuiteResult};
use crate::exitcode;
use crate::registry::Subcommand;

/// Inspect and initialize tool configuration
#[derive(Parser, Debug)]
#[command(name = "tool-config")]
#[command(version, about, long_about = None)]
pub struct ConfigArgs {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<ConfigCommand>,
}

#[derive(clap::Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show effective settings (default)
    View,

    /// Print a config template, or write it to a file
    Init {
        /// Write the template here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show config file locations
    Path,
}

pub struct ConfigCli {
    args: Vec<String>,
    options: Option<ConfigArgs>,
}

impl ConfigCli {
    pub fn new(args: Vec<String>) -> Self {
        Self {
            args,
            options: None,
        }
    }
}

fn init(output: Option<&PathBuf>) -> SuiteResult<()> {
    let Some(path) = output else {
        print!("{}", Settings::template());
        return Ok(());
    };
    if path.exists() {
        return Err(SuiteError::generic(format!(
            "refusing to overwrite existing file: {}",
            path.display()
        )));
    }
    std::fs::write(path, Settings::template())
        .map_err(|e| SuiteError::wrap(format!("cannot write {}", path.display()), e))?;
    println!("Created config template: {}", path.display());
    Ok(())
}

fn show_paths(settings: &Settings) {
    if let Some(explicit) = std::env::var_os(CONFIG_ENV_VAR) {
        println!("{}: {}", CONFIG_ENV_VAR, explicit.to_string_lossy());
    }
    for path in config_search_paths() {
        let state = if path.is_file() { "found" } else { "missing" };
        println!("{} ({})", path.display(), state);
    }
    match &settings.source {
        Some(path) => println!("loaded: {}", path.display()),
        None => println!("loaded: (none, using defaults)"),
    }
}

impl Subcommand for ConfigCli {
    fn run(&mut self, ctx: &RunContext<'_>) -> SuiteResult<i32> {
        let Some(options) = parse_args::<ConfigArgs>(&self.args)? else {
            return Ok(exitcode::OK);
        };
        ctx.diagnostics.set_verbosity(options.verbose);

        let result = match &options.command {
            None | Some(ConfigCommand::View) => {
                print!("{}", ctx.settings.to_toml()?);
                Ok(())
            }
            Some(ConfigCommand::Init { output }) => init(output.as_ref()),
            Some(ConfigCommand::Path) => {
                show_paths(ctx.settings);
                Ok(())
            }
        };

        self.options = Some(options);
        result.map(|()| exitcode::OK)
    }

    fn verbosity(&self) -> Option<u8> {
        self.options.as_ref().map(|o| o.verbose)
    }

    fn print_help(&self) {
        ConfigArgs::command().print_help().ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn verify_cli() {
        ConfigArgs::command().debug_assert();
    }

    #[test]
    fn given_output_path_when_init_then_writes_template() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tool.toml");

        init(Some(&path)).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, Settings::template());
    }

    #[test]
    fn given_existing_file_when_init_then_refuses() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tool.toml");
        std::fs::write(&path, "debug = true\n").unwrap();

        let err = init(Some(&path)).unwrap_err();

        assert_eq!(err.exit_code(), exitcode::GENERIC);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "debug = true\n");
    }

    #[test]
    fn given_unknown_flag_when_parsed_then_options_error() {
        let args: Vec<String> = vec!["tool-config".into(), "--bogus".into()];
        let err = parse_args::<ConfigArgs>(&args).unwrap_err();
        assert_eq!(err.exit_code(), exitcode::OPTIONS);
        assert!(err.to_string().contains("--bogus"));
    }
}
