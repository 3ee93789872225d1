//! The dispatcher: invocation name in, exit code out
//!
//! One run is a single-shot pipeline:
//!
//! ```text
//! locale + settings -> diagnostics -> alias -> implementation
//!   -> state dir -> argument encoding -> run() -> exit code
//! ```
//!
//! Every failure along the way is translated into exactly one exit code
//! (see [`crate::exitcode`]). The only deliberate escape is debug mode, where
//! unclassified failures propagate as panics.

use std::error::Error as StdError;
use std::ffi::OsString;
use std::rc::Rc;

use crate::alias::{resolve_alias, Invocation};
use crate::config::Settings;
use crate::context::{InterruptFlag, RunContext};
use crate::display::{Console, Diagnostics, LastResort};
use crate::environment::{ensure_state_directory, FileSystem, RealFileSystem};
use crate::error::{SuiteError, SuiteResult};
use crate::registry::{Registry, Subcommand};
use crate::trace::{capture_unwind, PanicReport};
use crate::{exitcode, locale, logging, runtime};

const ENCODING_ERROR: &str =
    "Command line args are not in utf-8, unable to continue.  tool currently only understands utf-8";

/// Source tag for deprecations raised by the dispatcher itself.
const DEPRECATION_SOURCE: &str = "tool.builtin";

/// A failure that ended the pipeline.
enum Failure {
    Error(SuiteError),
    Panic(PanicReport),
}

/// Convert every argument to UTF-8 text.
///
/// Fails on the first argument that is not valid UTF-8.
pub fn encode_args(argv: &[OsString]) -> SuiteResult<Vec<String>> {
    argv.iter()
        .enumerate()
        .map(|(index, arg)| {
            arg.clone()
                .into_string()
                .map_err(|raw| SuiteError::InvalidEncoding {
                    index,
                    lossy: raw.to_string_lossy().into_owned(),
                })
        })
        .collect()
}

pub struct Dispatcher {
    registry: Registry,
    settings: Option<Settings>,
    diagnostics: Option<Rc<dyn Diagnostics>>,
    fs: Box<dyn FileSystem>,
    runtime_version: String,
    interrupt: InterruptFlag,
}

impl Dispatcher {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            settings: None,
            diagnostics: None,
            fs: Box::new(RealFileSystem),
            runtime_version: runtime::CONTROLLER_RUNTIME.to_string(),
            interrupt: InterruptFlag::new(),
        }
    }

    /// Use these settings instead of loading them from files and environment.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Use this sink instead of building a console and tracing subscriber.
    pub fn with_diagnostics(mut self, diagnostics: Rc<dyn Diagnostics>) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    pub fn with_file_system(mut self, fs: Box<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn with_runtime_version(mut self, version: impl Into<String>) -> Self {
        self.runtime_version = version.into();
        self
    }

    /// Flag raised on operator interrupt; shared with the signal handler.
    pub fn interrupt_flag(&self) -> InterruptFlag {
        self.interrupt.clone()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Run one invocation and return its exit code.
    pub fn main<I>(&self, args: I) -> i32
    where
        I: IntoIterator<Item = OsString>,
    {
        let invocation = Invocation::capture(args);

        // Full diagnostics need configuration, so report through the fallback
        let locale = match locale::initialize() {
            Ok(locale) => locale,
            Err(e) => {
                LastResort.error(&e.to_string(), false);
                return exitcode::OPTIONS;
            }
        };
        let settings = match self.load_settings() {
            Ok(settings) => settings,
            Err(e) => {
                LastResort.error(&e.to_string(), false);
                return exitcode::OPTIONS;
            }
        };

        let diagnostics: Rc<dyn Diagnostics> = match &self.diagnostics {
            Some(diagnostics) => Rc::clone(diagnostics),
            None => {
                logging::init_logging(&settings);
                Rc::new(Console::new(&settings))
            }
        };
        let diagnostics = diagnostics.as_ref();
        self.warn_controller_runtime(&settings, diagnostics);
        if !locale.utf8 {
            diagnostics.debug(&format!(
                "locale {} is not UTF-8, arguments must still be UTF-8",
                locale.name.as_deref().unwrap_or("C")
            ));
        }
        diagnostics.debug("starting run");

        let ctx = RunContext {
            settings: &settings,
            diagnostics,
            interrupt: self.interrupt.clone(),
            aliases: self.registry.aliases(),
        };
        let mut implementation: Option<Box<dyn Subcommand>> = None;

        // Debug mode lets panics unwind past the dispatcher
        let outcome = if settings.debug {
            Ok(self.execute(&invocation, &ctx, &mut implementation))
        } else {
            capture_unwind(|| self.execute(&invocation, &ctx, &mut implementation))
        };

        let result = match outcome {
            _ if ctx.interrupted() => Err(Failure::Error(SuiteError::Interrupted)),
            Ok(Ok(code)) => Ok(code),
            Ok(Err(e)) => Err(Failure::Error(e)),
            Err(report) => Err(Failure::Panic(report)),
        };

        let verbosity = implementation.as_ref().and_then(|i| i.verbosity());
        if let Some(level) = verbosity {
            diagnostics.set_verbosity(level);
        }

        match result {
            Ok(code) => code,
            Err(failure) => self.translate(
                failure,
                implementation.as_deref(),
                verbosity,
                &settings,
                diagnostics,
            ),
        }
    }

    fn load_settings(&self) -> SuiteResult<Settings> {
        match &self.settings {
            Some(settings) => Ok(settings.clone()),
            None => Settings::load(),
        }
    }

    /// Deprecation note for an old controller runtime. Never fails the run.
    fn warn_controller_runtime(&self, settings: &Settings, diagnostics: &dyn Diagnostics) {
        if !settings.controller_runtime_warning {
            return;
        }
        match runtime::controller_notice(&self.runtime_version) {
            Ok(Some(msg)) => diagnostics.deprecated(&msg, runtime::ENFORCED_IN, DEPRECATION_SOURCE),
            Ok(None) => {}
            Err(e) => diagnostics.debug(&format!(
                "cannot check controller runtime version '{}': {}",
                self.runtime_version, e
            )),
        }
    }

    /// Steps from alias resolution to `run()`.
    fn execute(
        &self,
        invocation: &Invocation,
        ctx: &RunContext<'_>,
        slot: &mut Option<Box<dyn Subcommand>>,
    ) -> SuiteResult<i32> {
        let diagnostics = ctx.diagnostics;

        let alias = resolve_alias(&invocation.basename)?;
        let handle = self.registry.load(&alias, &invocation.basename)?;
        diagnostics.debug(&format!(
            "resolved '{}' to {} (alias '{}')",
            invocation.basename,
            handle.name(),
            handle.alias()
        ));

        ensure_state_directory(self.fs.as_ref(), &ctx.settings.state_dir, diagnostics);

        let args = encode_args(&invocation.argv)?;
        let implementation = slot.insert(handle.construct(args));
        implementation.run(ctx)
    }

    fn translate(
        &self,
        failure: Failure,
        implementation: Option<&dyn Subcommand>,
        verbosity: Option<u8>,
        settings: &Settings,
        diagnostics: &dyn Diagnostics,
    ) -> i32 {
        let error = match failure {
            Failure::Error(error) => error,
            Failure::Panic(report) => {
                return report_unclassified(
                    &report.message,
                    None,
                    &report.to_string(),
                    verbosity,
                    diagnostics,
                )
            }
        };

        match &error {
            SuiteError::Options { .. } => {
                if let Some(implementation) = implementation {
                    implementation.print_help();
                }
                diagnostics.error(&error.to_string(), false);
            }
            SuiteError::Parser { .. }
            | SuiteError::Generic { .. }
            | SuiteError::UnknownAlias { .. }
            | SuiteError::NotImplemented { .. } => {
                diagnostics.error(&error.to_string(), false);
                if let Some(cause) = error.wrapped_cause() {
                    diagnostics.vvv(&format!("original msg: {}", cause));
                }
            }
            SuiteError::InvalidEncoding { .. } => {
                diagnostics.error(ENCODING_ERROR, false);
                diagnostics.display(&format!("The full traceback was:\n\n{}", error), false);
            }
            SuiteError::Interrupted => diagnostics.error(&error.to_string(), true),
            SuiteError::Unexpected {
                message,
                source,
                trace,
            } => {
                if settings.debug {
                    panic!("{}\n{}", message, trace);
                }
                let cause = source.as_deref().map(|c| c as &(dyn StdError + 'static));
                return report_unclassified(message, cause, trace, verbosity, diagnostics);
            }
        }
        error.exit_code()
    }
}

/// Report a failure nobody anticipated.
///
/// The trace is displayed when verbosity is unknown or above 2; otherwise
/// it only goes to the log.
fn report_unclassified(
    message: &str,
    cause: Option<&(dyn StdError + 'static)>,
    trace: &str,
    verbosity: Option<u8>,
    diagnostics: &dyn Diagnostics,
) -> i32 {
    diagnostics.error(
        &format!("Unexpected Exception, this is probably a bug: {}", message),
        false,
    );

    let traceback = format!("the full traceback was:\n\n{}", trace);
    if verbosity.map_or(true, |v| v > 2) {
        if let Some(cause) = cause {
            diagnostics.vvv(&format!("\noriginal error: {:?}", cause));
            let why = cause.to_string();
            if why != message {
                diagnostics.vvv(&format!("\noriginal msg: {}", why));
            }
        }
        diagnostics.display(&traceback, false);
    } else {
        diagnostics.display("to see the full traceback, use -vvv", false);
        diagnostics.display(&traceback, true);
    }
    exitcode::UNEXPECTED
}
