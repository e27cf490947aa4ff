//! Structured key/value backend (logfmt lines)

use super::sink::Sink;
use crate::core::{
    render, FieldValue, FormatOptions, LogEntry, LogLevel, OutputFormat, Writer, WriterFactory,
};
use parking_lot::RwLock;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Shared configuration for structured writers: threshold, line options and sink.
///
/// Writers read the configuration when they write, so changing the level or sink
/// affects every engine using this logger's factory.
///
/// # Example
///
/// ```
/// use rust_context_logger::backends::{SharedBuffer, Sink, StructuredLogger};
/// use rust_context_logger::{Context, FormatOptions, LogLevel, Logger};
///
/// let buffer = SharedBuffer::new();
/// let structured = StructuredLogger::new(Sink::buffer(&buffer));
/// structured.set_level(LogLevel::Info);
/// structured.set_options(FormatOptions::plain());
///
/// let logger = Logger::builder()
///     .factory(structured.factory())
///     .without_default_fields()
///     .build();
/// logger.info(&Context::background(), format_args!("ready"));
///
/// assert_eq!(buffer.lines(), vec!["level=info msg=ready"]);
/// ```
#[derive(Debug)]
pub struct StructuredLogger {
    level: RwLock<LogLevel>,
    options: RwLock<FormatOptions>,
    sink: RwLock<Sink>,
}

impl StructuredLogger {
    pub fn new(sink: Sink) -> Arc<Self> {
        Arc::new(Self {
            level: RwLock::new(LogLevel::Info),
            options: RwLock::new(FormatOptions::default()),
            sink: RwLock::new(sink),
        })
    }

    /// Process-wide logger writing to stderr at info level, behind the default factory
    pub fn standard() -> &'static Arc<StructuredLogger> {
        static STANDARD: OnceLock<Arc<StructuredLogger>> = OnceLock::new();
        STANDARD.get_or_init(|| StructuredLogger::new(Sink::stderr()))
    }

    pub fn level(&self) -> LogLevel {
        *self.level.read()
    }

    pub fn set_level(&self, level: LogLevel) {
        *self.level.write() = level;
    }

    pub fn options(&self) -> FormatOptions {
        self.options.read().clone()
    }

    pub fn set_options(&self, options: FormatOptions) {
        *self.options.write() = options;
    }

    pub fn set_sink(&self, sink: Sink) {
        *self.sink.write() = sink;
    }

    /// Factory producing writers bound to this logger
    pub fn factory(self: &Arc<Self>) -> WriterFactory {
        let logger = Arc::clone(self);
        Arc::new(move || {
            Box::new(StructuredWriter {
                logger: Arc::clone(&logger),
                fields: Vec::new(),
            }) as Box<dyn Writer>
        })
    }
}

/// Writer producing one logfmt line per call
pub struct StructuredWriter {
    logger: Arc<StructuredLogger>,
    fields: Vec<(String, FieldValue)>,
}

impl StructuredWriter {
    /// Write the entry and hand back the rendered message
    fn write(self, level: LogLevel, args: fmt::Arguments<'_>) -> String {
        let message = render(args);
        let entry = LogEntry::new(level, message.clone()).with_fields(self.fields);
        let line = OutputFormat::Logfmt.format(&entry, &self.logger.options());
        self.logger.sink.read().write_line(&line);
        message
    }
}

impl Writer for StructuredWriter {
    fn level(&self) -> LogLevel {
        self.logger.level()
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
        self.write(LogLevel::Fatal, args);
        std::process::exit(1)
    }

    fn panic(self: Box<Self>, args: fmt::Arguments<'_>) -> ! {
        let message = self.write(LogLevel::Panic, args);
        panic!("{}", message)
    }
}
