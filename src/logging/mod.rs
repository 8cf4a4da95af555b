//! `tracing` output for the browser.
//!
//! Events are formatted by `tracing-subscriber` and forwarded line by line to
//! the devtools console. The console already timestamps entries, so the
//! formatter runs without a timer (`SystemTime` is unavailable on wasm32).

use crate::config::EnvConfig;
use std::io;

pub(crate) fn init(config: &EnvConfig) {
    let result = tracing_subscriber::fmt()
        .with_max_level(config.max_level())
        .without_time()
        .with_target(false)
        .with_writer(ConsoleWriter::default)
        .try_init();

    if result.is_ok() {
        tracing::debug!(api_url = %config.api_url, "logging initialised");
    }
}

/// Buffers one formatted event and emits it on drop.
#[derive(Default)]
pub(crate) struct ConsoleWriter {
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buf);
        let line = line.trim_end();
        if line.is_empty() {
            return;
        }

        let msg = wasm_bindgen::JsValue::from_str(line);
        match console_severity(line) {
            Severity::Error => web_sys::console::error_1(&msg),
            Severity::Warn => web_sys::console::warn_1(&msg),
            Severity::Log => web_sys::console::log_1(&msg),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Severity {
    Error,
    Warn,
    Log,
}

// Without a timer the fmt layer starts each line with the padded level.
fn console_severity(line: &str) -> Severity {
    let head = line.trim_start();
    if head.starts_with("ERROR") {
        Severity::Error
    } else if head.starts_with("WARN") {
        Severity::Warn
    } else {
        Severity::Log
    }
}
