//! Diagnostics sinks: how the dispatcher talks to the operator
//!
//! [`LastResort`] is usable before configuration is loaded. [`Console`] is
//! the full sink, which also mirrors every message into the log file.

mod console;
mod last_resort;

pub use console::Console;
pub use last_resort::LastResort;

/// Tracing target for messages meant for the log file only.
///
/// The stderr logging layer filters this target out, so sinks can record
/// everything they show without printing it twice.
pub const LOG_TARGET: &str = "tool::display";

/// Verbosity at which `vvv` output is shown.
pub const TRACE_VERBOSITY: u8 = 3;

/// Operator-facing message sink.
pub trait Diagnostics {
    /// Informational output. `log_only` messages go to the log file only.
    fn display(&self, msg: &str, log_only: bool);

    /// One-line fatal error on the error stream.
    fn error(&self, msg: &str, wrap_text: bool);

    fn warning(&self, msg: &str);

    fn debug(&self, msg: &str);

    /// Deprecation note for a feature going away in `version` of `source`.
    fn deprecated(&self, msg: &str, version: &str, source: &str);

    /// Extended detail, shown only at high verbosity.
    fn vvv(&self, msg: &str);

    /// Verbosity parsed from the sub-command's options.
    fn set_verbosity(&self, _level: u8) {}
}
