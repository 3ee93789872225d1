//! Terminal output with colors, mirrored into the log
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Mutex;

use colored::Colorize;
use console::{measure_text_width, Term};

use super::{Diagnostics, LOG_TARGET, TRACE_VERBOSITY};
use crate::config::Settings;

const DEFAULT_WIDTH: usize = 80;

/// Full diagnostics sink, available once settings are loaded.
#[derive(Debug)]
pub struct Console {
    debug: bool,
    deprecation_warnings: bool,
    verbosity: AtomicU8,
    width: usize,
    deprecations: Mutex<HashSet<String>>,
}

impl Console {
    pub fn new(settings: &Settings) -> Self {
        Self {
            debug: settings.debug,
            deprecation_warnings: settings.deprecation_warnings,
            verbosity: AtomicU8::new(0),
            width: terminal_width(),
            deprecations: Mutex::new(HashSet::new()),
        }
    }

    pub fn verbosity(&self) -> u8 {
        self.verbosity.load(Ordering::Relaxed)
    }

    /// Full deprecation text, or `None` when disabled or already shown.
    fn deprecation_notice(&self, msg: &str, version: &str, source: &str) -> Option<String> {
        if !self.deprecation_warnings {
            return None;
        }
        let full = format!(
            "{}. This feature will be removed from {} in version {}. \
             Deprecation warnings can be disabled by setting deprecation_warnings = false in tool.toml.",
            msg.trim_end_matches('.'),
            source,
            version
        );
        let first_time = self
            .deprecations
            .lock()
            .map(|mut seen| seen.insert(full.clone()))
            .unwrap_or(true);
        first_time.then_some(full)
    }
}

/// Width of the terminal behind stderr; 80 columns when it is not a tty.
fn terminal_width() -> usize {
    match Term::stderr().size_checked() {
        Some((_rows, cols)) if cols > 0 => usize::from(cols),
        _ => DEFAULT_WIDTH,
    }
}

/// Greedy word wrap; existing line breaks are kept.
pub(crate) fn wrap(text: &str, width: usize) -> String {
    let mut out = Vec::new();
    for line in text.lines() {
        let mut current = String::new();
        for word in line.split_whitespace() {
            if !current.is_empty()
                && measure_text_width(&current) + 1 + measure_text_width(word) > width
            {
                out.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        out.push(current);
    }
    out.join("\n")
}

impl Diagnostics for Console {
    fn display(&self, msg: &str, log_only: bool) {
        tracing::info!(target: LOG_TARGET, "{}", msg);
        if !log_only {
            println!("{}", msg);
        }
    }

    fn error(&self, msg: &str, wrap_text: bool) {
        tracing::error!(target: LOG_TARGET, "{}", msg);
        let prefix = "[ERROR]:";
        let body = if wrap_text {
            wrap(msg, self.width.saturating_sub(prefix.len() + 1).max(20))
        } else {
            msg.to_string()
        };
        eprintln!("{} {}", prefix.red().bold(), body.red());
    }

    fn warning(&self, msg: &str) {
        tracing::warn!(target: LOG_TARGET, "{}", msg);
        eprintln!("{} {}", "[WARNING]:".yellow(), msg);
    }

    fn debug(&self, msg: &str) {
        tracing::debug!(target: LOG_TARGET, "{}", msg);
        if self.debug {
            eprintln!("{:>6} {}", std::process::id(), msg.dimmed());
        }
    }

    fn deprecated(&self, msg: &str, version: &str, source: &str) {
        let Some(full) = self.deprecation_notice(msg, version, source) else {
            return;
        };
        tracing::warn!(target: LOG_TARGET, "{}", full);
        eprintln!("{} {}", "[DEPRECATION WARNING]:".magenta(), full.magenta());
    }

    fn vvv(&self, msg: &str) {
        let log_only = self.verbosity() < TRACE_VERBOSITY;
        tracing::info!(target: LOG_TARGET, "{}", msg);
        if !log_only {
            eprintln!("{}", msg.blue());
        }
    }

    fn set_verbosity(&self, level: u8) {
        self.verbosity.store(level, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_long_text_when_wrap_then_lines_fit_width() {
        let text = "Command line args are not in utf-8, unable to continue";
        let wrapped = wrap(text, 20);
        assert!(wrapped.lines().all(|l| l.len() <= 20));
        assert_eq!(wrapped.split_whitespace().count(), text.split_whitespace().count());
    }

    #[test]
    fn given_multiline_text_when_wrap_then_keeps_breaks() {
        let wrapped = wrap("first\nsecond", 80);
        assert_eq!(wrapped, "first\nsecond");
    }

    #[test]
    fn given_same_deprecation_twice_when_noticed_then_shown_once() {
        let console = Console::new(&Settings::default());

        let first = console.deprecation_notice("old flag", "2.0", "tool.builtin");
        let second = console.deprecation_notice("old flag", "2.0", "tool.builtin");
        let other = console.deprecation_notice("other flag", "2.0", "tool.builtin");

        assert!(first.is_some_and(|n| n.contains("removed from tool.builtin in version 2.0")));
        assert!(second.is_none());
        assert!(other.is_some());
    }

    #[test]
    fn given_deprecations_disabled_when_noticed_then_silent() {
        let settings = Settings {
            deprecation_warnings: false,
            ..Settings::default()
        };
        let console = Console::new(&settings);

        assert!(console
            .deprecation_notice("old flag", "2.0", "tool.builtin")
            .is_none());
    }

    #[test]
    fn given_new_console_when_set_verbosity_then_reports_level() {
        let console = Console::new(&Settings::default());
        assert_eq!(console.verbosity(), 0);
        console.set_verbosity(3);
        assert_eq!(console.verbosity(), 3);
    }
}
