//! Run-wide state handed to every sub-command

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::Settings;
use crate::display::Diagnostics;
use crate::exitcode;

/// Set when the operator interrupts the run.
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag(Arc<AtomicBool>);

impl InterruptFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Route Ctrl-C to this flag.
    ///
    /// The first interrupt only raises the flag so the running sub-command
    /// can stop; a second one exits immediately with the interrupt code.
    pub fn install_handler(&self) -> Result<(), ctrlc::Error> {
        let flag = self.clone();
        ctrlc::set_handler(move || {
            if flag.0.swap(true, Ordering::SeqCst) {
                eprintln!("User interrupted execution");
                std::process::exit(exitcode::INTERRUPTED);
            }
        })
    }
}

/// Everything a sub-command may read about the current run.
pub struct RunContext<'a> {
    pub settings: &'a Settings,
    pub diagnostics: &'a dyn Diagnostics,
    pub interrupt: InterruptFlag,
    /// Registered aliases, sorted
    pub aliases: Vec<String>,
}

impl<'a> RunContext<'a> {
    pub fn interrupted(&self) -> bool {
        self.interrupt.is_raised()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_cloned_flag_when_raised_then_visible_through_original() {
        let flag = InterruptFlag::new();
        let clone = flag.clone();
        assert!(!flag.is_raised());
        clone.raise();
        assert!(flag.is_raised());
    }
}
