//! Console backend: bracketed lines on stdout

use super::sink::Sink;
use crate::core::{
    render, FieldValue, FormatOptions, LogEntry, LogLevel, OutputFormat, TimestampFormat, Writer,
    WriterFactory,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Console writer settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleOptions {
    /// Calls below this level are dropped
    pub level: LogLevel,
    /// Omit the `YYYY/MM/DD HH:MM:SS` prefix
    pub disable_timestamp: bool,
}

impl ConsoleOptions {
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            disable_timestamp: false,
        }
    }

    #[must_use]
    pub fn without_timestamp(mut self) -> Self {
        self.disable_timestamp = true;
        self
    }

    fn format_options(&self) -> FormatOptions {
        FormatOptions {
            timestamp: (!self.disable_timestamp).then_some(TimestampFormat::StdLog),
            colors: false,
        }
    }
}

impl Default for ConsoleOptions {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

/// Writer printing `[LEVEL] [k=v][k=v] message` lines
///
/// # Example
///
/// ```
/// use rust_context_logger::backends::{ConsoleOptions, ConsoleWriter, SharedBuffer, Sink};
/// use rust_context_logger::{Context, LogLevel, Logger};
///
/// let buffer = SharedBuffer::new();
/// let options = ConsoleOptions::new(LogLevel::Debug).without_timestamp();
/// let logger = Logger::builder()
///     .factory(ConsoleWriter::factory_with_sink(options, Sink::buffer(&buffer)))
///     .without_default_fields()
///     .build();
///
/// logger.debug(&Context::background(), format_args!("this is {}", "debug"));
/// assert_eq!(buffer.lines(), vec!["[DEBUG] this is debug"]);
/// ```
pub struct ConsoleWriter {
    options: ConsoleOptions,
    sink: Sink,
    fields: Vec<(String, FieldValue)>,
}

impl ConsoleWriter {
    pub fn new(options: ConsoleOptions, sink: Sink) -> Self {
        Self {
            options,
            sink,
            fields: Vec::new(),
        }
    }

    /// Factory printing to stdout
    pub fn factory(options: ConsoleOptions) -> WriterFactory {
        Self::factory_with_sink(options, Sink::stdout())
    }

    pub fn factory_with_sink(options: ConsoleOptions, sink: Sink) -> WriterFactory {
        Arc::new(move || Box::new(ConsoleWriter::new(options, sink.clone())) as Box<dyn Writer>)
    }

    fn write(self, level: LogLevel, args: fmt::Arguments<'_>) -> String {
        let message = render(args);
        let entry = LogEntry::new(level, message.clone()).with_fields(self.fields);
        let line = OutputFormat::Bracketed.format(&entry, &self.options.format_options());
        self.sink.write_line(&line);
        message
    }
}

impl Writer for ConsoleWriter {
    fn level(&self) -> LogLevel {
        self.options.level
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::SharedBuffer;

    fn writer(buffer: &SharedBuffer, options: ConsoleOptions) -> Box<dyn Writer> {
        (ConsoleWriter::factory_with_sink(options, Sink::buffer(buffer)))()
    }

    #[test]
    fn test_console_line_layout() {
        let buffer = SharedBuffer::new();
        let mut w = writer(&buffer, ConsoleOptions::new(LogLevel::Debug).without_timestamp());
        w.with_field("component", FieldValue::from("rockets/log"));
        w.with_field("asset", FieldValue::from("ExampleWithDefaultLogger"));
        w.info(format_args!("this is info"));

        assert_eq!(
            buffer.lines(),
            vec!["[INFO] [asset=ExampleWithDefaultLogger][component=rockets/log] this is info"]
        );
    }

    #[test]
    fn test_console_timestamp_prefix() {
        let buffer = SharedBuffer::new();
        writer(&buffer, ConsoleOptions::new(LogLevel::Debug)).error(format_args!("failed"));

        let line = &buffer.lines()[0];
        // 2025/01/08 10:30:45 [ERROR] failed
        assert_eq!(line.len(), "2025/01/08 10:30:45 [ERROR] failed".len());
        assert!(line.ends_with(" [ERROR] failed"));
        assert_eq!(&line[4..5], "/");
    }

    #[test]
    fn test_console_level() {
        let w = writer(&SharedBuffer::new(), ConsoleOptions::new(LogLevel::Warn));
        assert_eq!(w.level(), LogLevel::Warn);
        assert_eq!(ConsoleOptions::default().level, LogLevel::Info);
    }

    #[test]
    fn test_options_from_json() {
        let options: ConsoleOptions =
            serde_json::from_str(r#"{"level":"error","disable_timestamp":true}"#).unwrap();
        assert_eq!(options, ConsoleOptions::new(LogLevel::Error).without_timestamp());
    }
}
