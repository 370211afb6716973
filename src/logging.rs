//! `tracing` output for the browser.
//!
//! A `tracing-subscriber` fmt layer formats each event into a
//! [`ConsoleWriter`], which hands the finished line to the devtools console
//! at the matching severity when it is dropped.

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;

type Sink = fn(Level, &str);

fn console_sink(level: Level, line: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        match level {
            Level::ERROR => web_sys::console::error_1(&line.into()),
            Level::WARN => web_sys::console::warn_1(&line.into()),
            _ => web_sys::console::log_1(&line.into()),
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = level;
        eprintln!("{line}");
    }
}

/// Buffers one formatted event.
pub struct ConsoleWriter {
    buf: Vec<u8>,
    level: Level,
    sink: Sink,
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
        let text = String::from_utf8_lossy(&self.buf);
        let line = text.trim_end();
        if !line.is_empty() {
            (self.sink)(self.level, line);
        }
    }
}

#[derive(Clone, Copy)]
pub struct ConsoleMakeWriter {
    sink: Sink,
}

impl Default for ConsoleMakeWriter {
    fn default() -> Self {
        Self { sink: console_sink }
    }
}

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter { buf: Vec::new(), level: Level::INFO, sink: self.sink }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter { buf: Vec::new(), level: *meta.level(), sink: self.sink }
    }
}

/// Debug builds log every action; release builds keep to notable events.
pub fn default_level() -> Level {
    if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

/// Install the global subscriber. Safe to call more than once.
pub fn init(max_level: Level) {
    let installed = tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter::default())
        .with_max_level(max_level)
        .without_time()
        .try_init();
    if let Err(e) = installed {
        console_sink(Level::WARN, &format!("logging not initialised: {e}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io::Write;

    thread_local! {
        static LINES: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
    }

    fn capture(level: Level, line: &str) {
        LINES.with(|l| l.borrow_mut().push((level, line.to_string())));
    }

    fn captured() -> Vec<(Level, String)> {
        LINES.with(|l| l.borrow_mut().drain(..).collect())
    }

    #[test]
    fn writer_emits_on_drop() {
        let mk = ConsoleMakeWriter { sink: capture };
        {
            let mut w = mk.make_writer();
            write!(w, "weather changed").unwrap();
            w.write_all(b" to Rainy\n").unwrap();
            assert!(captured().is_empty());
        }
        assert_eq!(captured(), vec![(Level::INFO, "weather changed to Rainy".to_string())]);
    }

    #[test]
    fn empty_writer_emits_nothing() {
        let mk = ConsoleMakeWriter { sink: capture };
        drop(mk.make_writer());
        assert!(captured().is_empty());
    }

    #[test]
    fn subscriber_routes_events_by_level() {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(ConsoleMakeWriter { sink: capture })
            .with_max_level(Level::INFO)
            .without_time()
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("hidden");
            tracing::warn!("save failed");
        });
        let lines = captured();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, Level::WARN);
        assert!(lines[0].1.contains("save failed"));
    }

    #[test]
    fn init_twice_does_not_panic() {
        init(Level::INFO);
        init(Level::DEBUG);
    }
}
