use super::Diagnostics;

/// Output of last resort: plain stderr, no formatting, no log file.
///
/// Used while configuration is not loaded yet, so it must not depend on it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LastResort;

impl Diagnostics for LastResort {
    fn display(&self, msg: &str, _log_only: bool) {
        eprintln!("{}", msg);
    }

    fn error(&self, msg: &str, _wrap_text: bool) {
        eprintln!("{}", msg);
    }

    fn warning(&self, msg: &str) {
        eprintln!("{}", msg);
    }

    fn debug(&self, _msg: &str) {}

    fn deprecated(&self, msg: &str, _version: &str, _source: &str) {
        eprintln!("{}", msg);
    }

    fn vvv(&self, _msg: &str) {}
}
