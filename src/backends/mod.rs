//! Reference writer backends

pub mod console;
pub mod json;
pub mod sink;
pub mod structured;
pub mod testing;

pub use console::{ConsoleOptions, ConsoleWriter};
pub use json::{JsonEncoderConfig, JsonLogger, JsonWriter};
pub use sink::{SharedBuffer, Sink};
pub use structured::{StructuredLogger, StructuredWriter};
pub use testing::{CaptureWriter, Terminated, TestCapture};

// Re-export the writer contract alongside its implementations
pub use crate::core::{Writer, WriterFactory};
