use std::env;
use std::io::Write;

use log::{LevelFilter, Metadata, Record};

use crate::config::LOG_LEVEL_ENV;

/// Writes `LEVEL target: message` lines to stderr, keeping stdout for the game.
struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let _ = writeln!(
                std::io::stderr().lock(),
                "{:<5} {}: {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: StderrLogger = StderrLogger;

/// Install the logger with the level named by `NAVALBATTLE_LOG`
/// (`off`, `error`, `warn`, `info`, `debug`, `trace`). Defaults to `info`.
/// Calling it again is harmless.
pub fn init_logging() {
    let level = env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|lvl| lvl.parse().ok())
        .unwrap_or(LevelFilter::Info);
    init_logging_with(level);
}

/// Install the logger with an explicit level.
pub fn init_logging_with(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
