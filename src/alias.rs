//! Alias resolution: which sub-command did the caller mean?
//!
//! The executable is installed under several names (`tool`, `tool-config`,
//! `tool-widget-2.9`, ...). Only the basename is consulted, never the
//! remaining arguments.

use std::ffi::OsString;
use std::path::Path;

use crate::error::{SuiteError, SuiteResult};

/// Name of the suite's primary executable.
pub const PRIMARY_NAME: &str = "tool";

/// Alias used when invoked under the primary name alone.
pub const DEFAULT_ALIAS: &str = "main";

/// Raw argument vector plus the basename it was launched under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub basename: String,
    pub argv: Vec<OsString>,
}

impl Invocation {
    pub fn capture<I>(args: I) -> Self
    where
        I: IntoIterator<Item = OsString>,
    {
        let argv: Vec<OsString> = args.into_iter().collect();
        let basename = argv.first().map(|a| basename_of(a)).unwrap_or_default();
        Self { basename, argv }
    }
}

/// File-name component of `argv[0]`, without the platform executable suffix.
fn basename_of(arg0: &OsString) -> String {
    let name = Path::new(arg0)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = std::env::consts::EXE_SUFFIX;
    if suffix.is_empty() {
        return name;
    }
    name.strip_suffix(suffix).map(str::to_string).unwrap_or(name)
}

/// Derive the alias from an invocation basename.
///
/// A trailing version token (`-2.9`, `-3`) is dropped once; the second
/// remaining token is the alias.
pub fn resolve_alias(basename: &str) -> SuiteResult<String> {
    let mut tokens: Vec<&str> = basename.split('-').collect();
    let versioned = tokens
        .last()
        .and_then(|t| t.chars().next())
        .is_some_and(|c| c.is_ascii_digit());
    if versioned {
        tokens.pop();
    }

    match tokens.as_slice() {
        [_, alias, ..] => Ok((*alias).to_string()),
        [only] if *only == PRIMARY_NAME => Ok(DEFAULT_ALIAS.to_string()),
        _ => Err(SuiteError::UnknownAlias {
            basename: basename.to_string(),
        }),
    }
}
