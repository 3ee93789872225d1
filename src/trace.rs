//! Panic capture for unclassified failures
//!
//! A panic inside a sub-command is a bug, but the dispatcher still owes the
//! caller an exit code. [`capture_unwind`] turns the panic into a
//! [`PanicReport`] carrying the message, location and backtrace, and keeps
//! the default hook from printing it.

use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

static HOOK: Once = Once::new();

thread_local! {
    static CAPTURING: Cell<bool> = const { Cell::new(false) };
    static LAST_PANIC: RefCell<Option<PanicReport>> = const { RefCell::new(None) };
}

/// What a caught panic left behind.
#[derive(Debug, Clone)]
pub struct PanicReport {
    pub message: String,
    pub location: Option<String>,
    pub backtrace: String,
}

impl fmt::Display for PanicReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => writeln!(f, "panicked at {}: {}", location, self.message)?,
            None => writeln!(f, "panicked: {}", self.message)?,
        }
        write!(f, "{}", self.backtrace)
    }
}

fn payload_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}

/// Install the recording hook once; threads not capturing keep the
/// previous hook's behavior.
fn install_hook() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if CAPTURING.with(Cell::get) {
                let report = PanicReport {
                    message: payload_message(info.payload()),
                    location: info.location().map(|l| l.to_string()),
                    backtrace: Backtrace::force_capture().to_string(),
                };
                LAST_PANIC.with(|slot| *slot.borrow_mut() = Some(report));
            } else {
                previous(info);
            }
        }));
    });
}

/// Run `f`, converting a panic into a [`PanicReport`].
pub fn capture_unwind<F, R>(f: F) -> Result<R, PanicReport>
where
    F: FnOnce() -> R,
{
    install_hook();
    let was_capturing = CAPTURING.with(|c| c.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    CAPTURING.with(|c| c.set(was_capturing));

    result.map_err(|payload| {
        LAST_PANIC
            .with(|slot| slot.borrow_mut().take())
            .unwrap_or_else(|| PanicReport {
                message: payload_message(payload.as_ref()),
                location: None,
                backtrace: String::new(),
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_panic_when_capture_then_returns_value() {
        assert_eq!(capture_unwind(|| 42).unwrap(), 42);
    }

    #[test]
    fn given_panic_when_capture_then_reports_message_and_location() {
        let report = capture_unwind::<_, i32>(|| panic!("widget exploded")).unwrap_err();

        assert_eq!(report.message, "widget exploded");
        assert!(report
            .location
            .as_deref()
            .is_some_and(|l| l.contains("trace.rs")));
        assert!(report.to_string().starts_with("panicked at"));
    }

    #[test]
    fn given_formatted_panic_when_capture_then_message_is_formatted() {
        let report = capture_unwind::<_, ()>(|| panic!("bad index {}", 7)).unwrap_err();
        assert_eq!(report.message, "bad index 7");
    }
}
