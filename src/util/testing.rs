//! Test support: logging setup and a recording diagnostics sink

use std::cell::{Cell, RefCell};
use std::env;
use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::display::Diagnostics;

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_test_writer()
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else if let Err(e) = subscriber.try_init() {
        eprintln!("Error: Failed to set up logging: {}", e);
    }

    if env::var("RUST_LOG").is_err() {
        debug!("RUST_LOG not set, defaulting to debug");
    }
}

/// Which sink method received a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Display,
    /// `display` with `log_only = true`
    Log,
    Error,
    Warning,
    Debug,
    Deprecated,
    Vvv,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub channel: Channel,
    pub message: String,
}

/// Diagnostics sink that keeps every message for later assertions.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    entries: RefCell<Vec<Entry>>,
    verbosity: Cell<u8>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, channel: Channel, message: &str) {
        self.entries.borrow_mut().push(Entry {
            channel,
            message: message.to_string(),
        });
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.entries.borrow().clone()
    }

    /// Messages received on one channel, in order.
    pub fn messages(&self, channel: Channel) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .filter(|e| e.channel == channel)
            .map(|e| e.message.clone())
            .collect()
    }

    /// Whether any message on `channel` contains `needle`.
    pub fn contains(&self, channel: Channel, needle: &str) -> bool {
        self.messages(channel).iter().any(|m| m.contains(needle))
    }

    pub fn verbosity(&self) -> u8 {
        self.verbosity.get()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn display(&self, msg: &str, log_only: bool) {
        let channel = if log_only { Channel::Log } else { Channel::Display };
        self.push(channel, msg);
    }

    fn error(&self, msg: &str, _wrap_text: bool) {
        self.push(Channel::Error, msg);
    }

    fn warning(&self, msg: &str) {
        self.push(Channel::Warning, msg);
    }

    fn debug(&self, msg: &str) {
        self.push(Channel::Debug, msg);
    }

    fn deprecated(&self, msg: &str, version: &str, source: &str) {
        self.push(
            Channel::Deprecated,
            &format!("{} (removed from {} in {})", msg, source, version),
        );
    }

    fn vvv(&self, msg: &str) {
        self.push(Channel::Vvv, msg);
    }

    fn set_verbosity(&self, level: u8) {
        self.verbosity.set(level);
    }
}

// test
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_setup() {
        init_test_setup();
    }

    #[test]
    fn given_messages_when_recorded_then_filtered_by_channel() {
        let sink = RecordingDiagnostics::new();
        sink.error("boom", false);
        sink.display("shown", false);
        sink.display("hidden", true);

        assert_eq!(sink.messages(Channel::Error), vec!["boom"]);
        assert!(sink.contains(Channel::Log, "hidden"));
        assert!(!sink.contains(Channel::Display, "hidden"));
        assert_eq!(sink.entries().len(), 3);
    }
}
