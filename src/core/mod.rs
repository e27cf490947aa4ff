//! Core engine types and traits

pub mod caller;
pub mod error;
pub mod exclusion;
pub mod field;
pub mod log_context;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod output_format;
pub mod registry;
pub mod stack_trace;
pub mod timestamp;
pub mod writer;

pub use caller::CallerLocation;
pub use error::{LoggerError, Result};
pub use exclusion::{ExcludeRule, ExclusionRules};
pub use field::Field;
pub use log_context::{Context, FieldValue};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder, DEFAULT_FRAMES_TO_SKIP};
pub use metrics::EmissionMetrics;
pub use output_format::{
    bracket_fields, format_json_with, logfmt_level_name, FormatOptions, JsonKeys, OutputFormat,
};
pub use registry::FieldRegistry;
pub use stack_trace::{
    context_with_stack_trace, find_stack_trace, with_stack, StackTrace, TracedError,
};
pub use timestamp::TimestampFormat;
pub use writer::{default_factory, render, set_default_factory, Writer, WriterFactory};
