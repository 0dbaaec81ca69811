//! `log` records forwarded to the browser console.

use std::fmt;

use log::Level;

/// One console line: `[LEVEL target] message`.
pub fn format_record(level: Level, target: &str, args: &fmt::Arguments<'_>) -> String {
    format!("[{level} {target}] {args}")
}

#[cfg(target_arch = "wasm32")]
pub use console::{ConsoleLogger, init};

#[cfg(target_arch = "wasm32")]
mod console {
    use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
    use wasm_bindgen::JsValue;
    use web_sys::console;

    pub struct ConsoleLogger;

    static LOGGER: ConsoleLogger = ConsoleLogger;

    impl Log for ConsoleLogger {
        fn enabled(&self, metadata: &Metadata<'_>) -> bool {
            metadata.level() <= log::max_level()
        }

        fn log(&self, record: &Record<'_>) {
            if !self.enabled(record.metadata()) {
                return;
            }
            let line = JsValue::from_str(&super::format_record(
                record.level(),
                record.target(),
                record.args(),
            ));
            match record.level() {
                Level::Error => console::error_1(&line),
                Level::Warn => console::warn_1(&line),
                Level::Info => console::info_1(&line),
                Level::Debug | Level::Trace => console::debug_1(&line),
            }
        }

        fn flush(&self) {}
    }

    /// Install the console logger. Fails if a logger is already set.
    pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_logger(&LOGGER)?;
        log::set_max_level(level);
        Ok(())
    }
}
