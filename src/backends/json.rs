//! JSON backend for structured logging
//!
//! Writes each entry as a single-line JSON object (JSONL format), compatible with log
//! aggregation tools like ELK, Loki, etc.

use super::sink::Sink;
use crate::core::{
    format_json_with, render, FieldValue, FormatOptions, JsonKeys, LogEntry, LogLevel,
    LoggerError, Result, TimestampFormat, Writer, WriterFactory,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Encoder settings of the JSON backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonEncoderConfig {
    pub level: LogLevel,
    pub keys: JsonKeys,
    /// `None` leaves the time key out
    pub timestamp: Option<TimestampFormat>,
}

impl Default for JsonEncoderConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            keys: JsonKeys::default(),
            timestamp: Some(TimestampFormat::UnixMillis),
        }
    }
}

impl JsonEncoderConfig {
    /// Key names must be non-empty and distinct; a custom timestamp must parse
    pub fn validate(&self) -> Result<()> {
        let keys = [
            ("level", &self.keys.level),
            ("time", &self.keys.time),
            ("message", &self.keys.message),
        ];

        for (name, key) in keys {
            if key.trim().is_empty() {
                return Err(LoggerError::config(
                    "json",
                    format!("{} key must not be empty", name),
                ));
            }
        }

        let timed = self.timestamp.is_some();
        if self.keys.level == self.keys.message
            || (timed && (self.keys.time == self.keys.level || self.keys.time == self.keys.message))
        {
            return Err(LoggerError::config("json", "level, time and message keys must differ"));
        }

        if let Some(format) = &self.timestamp {
            if !format.is_valid() {
                return Err(LoggerError::config(
                    "json",
                    format!("unsupported timestamp format {:?}", format),
                ));
            }
        }

        Ok(())
    }
}

/// Shared state of JSON writers
///
/// # Example
///
/// ```
/// use rust_context_logger::backends::{JsonEncoderConfig, JsonLogger, SharedBuffer, Sink};
/// use rust_context_logger::{Context, Field, Logger};
///
/// let buffer = SharedBuffer::new();
/// let config = JsonEncoderConfig { timestamp: None, ..Default::default() };
/// let json = JsonLogger::new(config, Sink::buffer(&buffer)).unwrap();
///
/// const ASSET: Field = Field::from_static("asset");
/// let logger = Logger::builder()
///     .factory(json.factory())
///     .without_default_fields()
///     .field(ASSET)
///     .build();
/// logger.info(&Context::background().with_value(ASSET, "job1"), format_args!("done"));
///
/// assert_eq!(buffer.lines(), vec![r#"{"level":"info","msg":"done","asset":"job1"}"#]);
/// ```
#[derive(Debug)]
pub struct JsonLogger {
    config: RwLock<JsonEncoderConfig>,
    sink: Sink,
}

impl JsonLogger {
    pub fn new(config: JsonEncoderConfig, sink: Sink) -> Result<Arc<Self>> {
        config.validate()?;
        Ok(Arc::new(Self {
            config: RwLock::new(config),
            sink,
        }))
    }

    pub fn level(&self) -> LogLevel {
        self.config.read().level
    }

    pub fn set_level(&self, level: LogLevel) {
        self.config.write().level = level;
    }

    pub fn config(&self) -> JsonEncoderConfig {
        self.config.read().clone()
    }

    pub fn factory(self: &Arc<Self>) -> WriterFactory {
        let logger = Arc::clone(self);
        Arc::new(move || {
            Box::new(JsonWriter {
                logger: Arc::clone(&logger),
                fields: Vec::new(),
            }) as Box<dyn Writer>
        })
    }

    fn write(&self, entry: &LogEntry) {
        let config = self.config.read();
        let options = FormatOptions {
            timestamp: config.timestamp.clone(),
            colors: false,
        };
        let line = format_json_with(entry, &config.keys, &options);
        self.sink.write_line(&line);
    }
}

/// Writer producing one JSON object per call
pub struct JsonWriter {
    logger: Arc<JsonLogger>,
    fields: Vec<(String, FieldValue)>,
}

impl JsonWriter {
    fn write(self, level: LogLevel, args: fmt::Arguments<'_>) -> String {
        let message = render(args);
        let entry = LogEntry::new(level, message.clone()).with_fields(self.fields);
        self.logger.write(&entry);
        message
    }
}

impl Writer for JsonWriter {
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
