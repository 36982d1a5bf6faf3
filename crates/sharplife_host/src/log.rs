// crates/sharplife_host/src/log.rs
//! Diagnostic sink for the wrapper.
//!
//! The engine gives the wrapper no way to report errors, so everything goes to an
//! append-only file next to the process. Debug logging starts enabled so failures
//! before the configuration is read are always recorded.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, Registry};

pub const LOG_FILENAME: &str = "SharpLifeWrapper-Native.log";

/// Local time prefix on every line, e.g. `[17/10/2026 14:03:11 +0200]:`.
const TIMESTAMP_FORMAT: &str = "[%d/%m/%Y %T %z]:";

static DEBUG_FILTER: OnceLock<reload::Handle<LevelFilter, Registry>> = OnceLock::new();

/// Installs the process-wide file subscriber writing to [`LOG_FILENAME`].
pub fn init() -> bool {
    init_with_file(Path::new(LOG_FILENAME))
}

/// Installs the process-wide file subscriber. Returns `false` if the file could not
/// be opened or another subscriber is already installed; logging then goes nowhere.
pub fn init_with_file(path: &Path) -> bool {
    if DEBUG_FILTER.get().is_some() {
        return true;
    }

    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => file,
        Err(_) => return false,
    };

    let (filter, handle) = reload::Layer::new(LevelFilter::TRACE);
    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_owned()))
        .with_writer(Mutex::new(file));

    if tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .is_err()
    {
        return false;
    }

    DEBUG_FILTER.set(handle).is_ok()
}

/// Turns debug logging on or off once the configuration has been read.
pub fn set_debug_logging_enabled(enabled: bool) {
    let Some(handle) = DEBUG_FILTER.get() else {
        return;
    };

    let level = if enabled { LevelFilter::TRACE } else { LevelFilter::OFF };
    if let Err(err) = handle.modify(|filter| *filter = level) {
        // The sink itself is what failed, so stderr is the only place left to say so
        eprintln!("{LOG_FILENAME}: failed to set debug logging to {enabled}: {err}");
    }
}
