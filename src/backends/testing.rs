//! In-memory backend for tests
//!
//! Entries are recorded and echoed through `println!`, so the harness shows them for
//! failing tests only. While the capture is alive, fatal and panic calls unwind with a
//! [`Terminated`] payload instead of ending the process; once the capture is dropped,
//! writers it produced fall back to printing and then terminating for real.

use crate::core::{
    render, FieldValue, FormatOptions, LogEntry, LogLevel, OutputFormat, Writer, WriterFactory,
};
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};

/// Panic payload raised by capture writers for fatal and panic calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terminated {
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug, Default)]
struct CaptureState {
    entries: Mutex<Vec<LogEntry>>,
}

/// Recording writer backend
///
/// # Example
///
/// ```
/// use rust_context_logger::backends::{TestCapture, Terminated};
/// use rust_context_logger::{Context, LogLevel, Logger};
/// use std::panic::{catch_unwind, AssertUnwindSafe};
///
/// let capture = TestCapture::new();
/// let logger = Logger::with_factory(capture.factory());
///
/// let result = catch_unwind(AssertUnwindSafe(|| {
///     logger.fatal(&Context::background(), format_args!("cannot continue"));
/// }));
///
/// let payload = result.unwrap_err();
/// let terminated = payload.downcast_ref::<Terminated>().unwrap();
/// assert_eq!(terminated.level, LogLevel::Fatal);
/// assert_eq!(capture.entries()[0].message, "cannot continue");
/// ```
#[derive(Debug)]
pub struct TestCapture {
    level: LogLevel,
    state: Arc<CaptureState>,
}

impl TestCapture {
    /// Capture accepting debug and above
    pub fn new() -> Self {
        Self::with_level(LogLevel::Debug)
    }

    pub fn with_level(level: LogLevel) -> Self {
        Self {
            level,
            state: Arc::new(CaptureState::default()),
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Factory of writers recording into this capture
    pub fn factory(&self) -> WriterFactory {
        let level = self.level;
        let state = Arc::downgrade(&self.state);
        Arc::new(move || {
            Box::new(CaptureWriter {
                level,
                state: state.clone(),
                fields: Vec::new(),
            }) as Box<dyn Writer>
        })
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.state.entries.lock().clone()
    }

    /// Recorded entries rendered as bracketed lines without timestamp
    pub fn lines(&self) -> Vec<String> {
        self.state
            .entries
            .lock()
            .iter()
            .map(|entry| OutputFormat::Bracketed.format(entry, &FormatOptions::plain()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.state.entries.lock().clear();
    }
}

impl Default for TestCapture {
    fn default() -> Self {
        Self::new()
    }
}

/// Writer recording into a [`TestCapture`]
pub struct CaptureWriter {
    level: LogLevel,
    state: Weak<CaptureState>,
    fields: Vec<(String, FieldValue)>,
}

impl CaptureWriter {
    /// Record and echo the entry; returns the rendered message and whether the
    /// capture was still alive
    fn write(self, level: LogLevel, args: fmt::Arguments<'_>) -> (String, bool) {
        let message = render(args);
        let entry = LogEntry::new(level, message.clone()).with_fields(self.fields);
        println!(
            "{}",
            OutputFormat::Bracketed.format(&entry, &FormatOptions::plain())
        );

        match self.state.upgrade() {
            Some(state) => {
                state.entries.lock().push(entry);
                (message, true)
            }
            None => (message, false),
        }
    }
}

impl Writer for CaptureWriter {
    fn level(&self) -> LogLevel {
        self.level
    }

    fn with_field(&mut self, key: &str, value: FieldValue) {
        self.fields.push((key.to_string(), value));
    }

    fn debug(self: Box<Self>, args: fmt::Arguments<'_>) {
        self.write(LogLevel::Debug, args);
    }

    fn info(self: Box<Self>, args: fmt::Arguments<'_>) {
        self.write(LogLevel::Info, args);
    }

    fn warn(self: Box<Self>, args: fmt::Arguments<'_>) {
        self.write(LogLevel::Warn, args);
    }

    fn error(self: Box<Self>, args: fmt::Arguments<'_>) {
        self.write(LogLevel::Error, args);
    }

    fn fatal(self: Box<Self>, args: fmt::Arguments<'_>) -> ! {
        let (message, live) = self.write(LogLevel::Fatal, args);
        if live {
            std::panic::panic_any(Terminated {
                level: LogLevel::Fatal,
                message,
            })
        }
        std::process::exit(2)
    }

    fn panic(self: Box<Self>, args: fmt::Arguments<'_>) -> ! {
        let (message, live) = self.write(LogLevel::Panic, args);
        if live {
            std::panic::panic_any(Terminated {
                level: LogLevel::Panic,
                message,
            })
        }
        panic!("{}", message)
    }
}
