//! Error taxonomy for the dispatcher and the sub-commands it runs

use std::backtrace::Backtrace;
use std::error::Error as StdError;

use thiserror::Error;

use crate::exitcode;

type BoxedCause = Box<dyn StdError + Send + Sync>;

/// Every failure that can end a run.
///
/// Sub-commands return these from `run()`; the dispatcher maps each variant
/// to exactly one exit code via [`SuiteError::exit_code`].
#[derive(Error, Debug)]
pub enum SuiteError {
    /// Options or configuration could not be loaded or are invalid.
    #[error("{message}")]
    Options { message: String },

    /// A structured input (playbook, inventory, data file) failed to parse.
    #[error("{message}")]
    Parser {
        message: String,
        #[source]
        source: Option<BoxedCause>,
    },

    /// Catch-all for recognized domain failures.
    #[error("{message}")]
    Generic {
        message: String,
        #[source]
        source: Option<BoxedCause>,
    },

    #[error("Unknown tool alias: {basename}")]
    UnknownAlias { basename: String },

    #[error("tool sub-program not implemented: {basename}")]
    NotImplemented { alias: String, basename: String },

    #[error("argument {index} is not valid UTF-8: {lossy}")]
    InvalidEncoding { index: usize, lossy: String },

    #[error("User interrupted execution")]
    Interrupted,

    /// Anything the suite did not anticipate. Treated as a bug.
    #[error("{message}")]
    Unexpected {
        message: String,
        #[source]
        source: Option<BoxedCause>,
        trace: String,
    },
}

/// Result type for dispatcher and sub-command operations.
pub type SuiteResult<T> = Result<T, SuiteError>;

impl SuiteError {
    pub fn options(message: impl Into<String>) -> Self {
        Self::Options {
            message: message.into(),
        }
    }

    pub fn parser(message: impl Into<String>) -> Self {
        Self::Parser {
            message: message.into(),
            source: None,
        }
    }

    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
            source: None,
        }
    }

    /// Domain error that keeps the failure it was raised from.
    pub fn wrap(message: impl Into<String>, cause: impl Into<BoxedCause>) -> Self {
        Self::Generic {
            message: message.into(),
            source: Some(cause.into()),
        }
    }

    /// Unclassified failure. Captures a backtrace at the call site.
    pub fn unexpected(message: impl Into<String>, cause: Option<BoxedCause>) -> Self {
        Self::Unexpected {
            message: message.into(),
            source: cause,
            trace: Backtrace::force_capture().to_string(),
        }
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            SuiteError::Options { .. } => exitcode::OPTIONS,
            SuiteError::Parser { .. } => exitcode::PARSER,
            SuiteError::Generic { .. }
            | SuiteError::UnknownAlias { .. }
            | SuiteError::NotImplemented { .. } => exitcode::GENERIC,
            SuiteError::InvalidEncoding { .. } => exitcode::ENCODING,
            SuiteError::Interrupted => exitcode::INTERRUPTED,
            SuiteError::Unexpected { .. } => exitcode::UNEXPECTED,
        }
    }

    /// The original failure this error wraps, if any.
    pub fn wrapped_cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            SuiteError::Parser { source, .. }
            | SuiteError::Generic { source, .. }
            | SuiteError::Unexpected { source, .. } => source.as_deref(),
            _ => None,
        }
    }

    pub fn is_unclassified(&self) -> bool {
        matches!(self, SuiteError::Unexpected { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn given_each_kind_when_exit_code_then_matches_contract() {
        assert_eq!(SuiteError::options("bad").exit_code(), 5);
        assert_eq!(SuiteError::parser("bad yaml").exit_code(), 4);
        assert_eq!(SuiteError::generic("boom").exit_code(), 1);
        assert_eq!(
            SuiteError::UnknownAlias {
                basename: "x".into()
            }
            .exit_code(),
            1
        );
        assert_eq!(
            SuiteError::NotImplemented {
                alias: "x".into(),
                basename: "tool-x".into()
            }
            .exit_code(),
            1
        );
        assert_eq!(
            SuiteError::InvalidEncoding {
                index: 1,
                lossy: "?".into()
            }
            .exit_code(),
            6
        );
        assert_eq!(SuiteError::Interrupted.exit_code(), 99);
        assert_eq!(SuiteError::unexpected("bug", None).exit_code(), 250);
    }

    #[test]
    fn given_wrapped_error_when_wrapped_cause_then_returns_original() {
        let err = SuiteError::wrap(
            "cannot read inventory",
            io::Error::new(io::ErrorKind::NotFound, "hosts missing"),
        );
        let cause = err.wrapped_cause().expect("cause present");
        assert_eq!(cause.to_string(), "hosts missing");
        assert!(SuiteError::generic("plain").wrapped_cause().is_none());
    }

    #[test]
    fn given_unexpected_when_created_then_carries_trace() {
        let err = SuiteError::unexpected("bug", None);
        assert!(err.is_unclassified());
        match err {
            SuiteError::Unexpected { trace, .. } => assert!(!trace.is_empty()),
            _ => unreachable!(),
        }
    }
}
