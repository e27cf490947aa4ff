//! # Rust Context Logger
//!
//! A context-aware structured logging facade. Callers attach key/value pairs to a
//! [`Context`]; the engine projects the registered fields into a pluggable backend
//! [`Writer`] on every log call, together with the caller's source location.
//!
//! ## Features
//!
//! - **Field registry**: only registered fields are written, in sorted order
//! - **Exclusion rules**: drop calls whose context carries a given field value
//! - **Caller location**: `source_file`, `source_line` and `caller` are resolved per call
//! - **Stack traces**: errors wrapped with [`with_stack`] carry their trace into the log
//! - **Pluggable backends**: console, structured (logfmt), JSON, and a capturing test backend
//!
//! ## Example
//!
//! ```
//! use rust_context_logger::backends::TestCapture;
//! use rust_context_logger::{info, Context, Field, Logger};
//!
//! const ASSET: Field = Field::from_static("asset");
//!
//! let capture = TestCapture::new();
//! let logger = Logger::with_factory(capture.factory());
//! logger.register_field([ASSET]);
//!
//! let ctx = Context::background().with_value(ASSET, "job1");
//! info!(logger => &ctx, "processed {} records", 12);
//!
//! assert_eq!(capture.entries()[0].field("asset").unwrap().to_string(), "job1");
//! ```

pub mod backends;
pub mod core;
pub mod facade;
pub mod macros;

pub mod prelude {
    pub use crate::backends::{ConsoleOptions, ConsoleWriter, StructuredLogger, TestCapture};
    pub use crate::core::{
        Context, EmissionMetrics, ExcludeRule, Field, FieldValue, LogLevel, Logger,
        LoggerBuilder, LoggerError, Result, StackTrace, TracedError, Writer, WriterFactory,
    };
}

pub use crate::core::{
    context_with_stack_trace, default_factory, find_stack_trace, set_default_factory, with_stack,
    CallerLocation, Context, EmissionMetrics, ExcludeRule, Field, FieldValue, FormatOptions,
    LogEntry, LogLevel, Logger, LoggerBuilder, LoggerError, OutputFormat, Result, StackTrace,
    TimestampFormat, TracedError, Writer, WriterFactory, DEFAULT_FRAMES_TO_SKIP,
};
pub use facade::{
    debug, error, error_with_stack_trace, fatal, field_values, frames_to_skip, info, log, panic,
    register_default_fields, register_field, registered_fields, reset_to_defaults,
    set_frames_to_skip, skip, skip_rules, unregister_field, unskip, warn, GLOBAL_FRAMES_TO_SKIP,
};
