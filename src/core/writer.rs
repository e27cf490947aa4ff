//! Backend writer contract

use super::log_context::FieldValue;
use super::log_level::LogLevel;
use parking_lot::RwLock;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// One-shot sink for a single log call.
///
/// The engine obtains a fresh writer from a [`WriterFactory`] for every call, attaches
/// fields to it, then consumes it with exactly one severity method. The methods take
/// `self: Box<Self>` so a writer cannot be reused after it wrote.
///
/// `fatal` must terminate the process after writing and `panic` must unwind; both are
/// typed `-> !` so callers can rely on it.
pub trait Writer: Send {
    /// Minimum level this writer emits; the engine drops calls below it
    fn level(&self) -> LogLevel;

    /// Attach a key/value pair to the pending entry
    fn with_field(&mut self, key: &str, value: FieldValue);

    fn debug(self: Box<Self>, args: fmt::Arguments<'_>);
    fn info(self: Box<Self>, args: fmt::Arguments<'_>);
    fn warn(self: Box<Self>, args: fmt::Arguments<'_>);
    fn error(self: Box<Self>, args: fmt::Arguments<'_>);
    fn fatal(self: Box<Self>, args: fmt::Arguments<'_>) -> !;
    fn panic(self: Box<Self>, args: fmt::Arguments<'_>) -> !;
}

/// Produces a fresh writer per log call
pub type WriterFactory = Arc<dyn Fn() -> Box<dyn Writer> + Send + Sync>;

/// Render format arguments to a message.
///
/// Arguments without placeholders are taken verbatim, so a literal message containing
/// `%` or braces passed as a pre-formatted string is never reinterpreted.
pub fn render(args: fmt::Arguments<'_>) -> String {
    match args.as_str() {
        Some(literal) => literal.to_string(),
        None => fmt::format(args),
    }
}

fn default_slot() -> &'static RwLock<WriterFactory> {
    static DEFAULT_FACTORY: OnceLock<RwLock<WriterFactory>> = OnceLock::new();
    DEFAULT_FACTORY.get_or_init(|| {
        RwLock::new(crate::backends::StructuredLogger::standard().factory())
    })
}

/// Factory used by engines constructed without one
pub fn default_factory() -> WriterFactory {
    Arc::clone(&default_slot().read())
}

/// Replace the process-wide default factory
pub fn set_default_factory(factory: WriterFactory) {
    *default_slot().write() = factory;
}
