//! Tracing subscriber setup
//!
//! Two layers: stderr for the suite's own tracing output, and an optional
//! log file that also receives everything the diagnostics sink shows.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::config::Settings;
use crate::display::{Diagnostics, LastResort, LOG_TARGET};

fn open_log(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber. Later calls are no-ops.
///
/// An unwritable log file is reported through the fallback sink and
/// logging continues without it.
pub fn init_logging(settings: &Settings) {
    let stderr_filter = if settings.debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };

    // Sink mirror events are shown by the sink itself
    let not_display = filter_fn(|metadata| metadata.target() != LOG_TARGET);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(stderr_filter)
        .with_filter(not_display);

    let file_filter = if settings.debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let file_layer = settings.log_path.as_deref().and_then(|path| match open_log(path) {
        Ok(file) => Some(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false)
                .with_filter(file_filter),
        ),
        Err(e) => {
            LastResort.warning(&format!(
                "log file at '{}' is not writeable, logging to it is disabled: {}",
                path.display(),
                e
            ));
            None
        }
    });

    if tracing::dispatcher::has_been_set() {
        tracing::debug!("Tracing subscriber already set");
        return;
    }
    if let Err(e) = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
    {
        LastResort.warning(&format!("Failed to set up logging: {}", e));
    }

    if settings.debug {
        tracing::debug!("Debug mode: debug");
    }
}
