//! Emission engine: projects registered context fields into backend writers

use super::{
    caller::CallerLocation,
    exclusion::{is_suppressed, ExcludeRule, ExclusionRules},
    field::Field,
    log_context::{Context, FieldValue},
    log_level::LogLevel,
    metrics::EmissionMetrics,
    registry::FieldRegistry,
    stack_trace::context_with_stack_trace,
    writer::{default_factory, WriterFactory},
};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Frames between the stack walk and the user's call site for an engine method call:
/// `emit` itself, then the public level method.
pub const DEFAULT_FRAMES_TO_SKIP: usize = 2;

/// A context-aware logger.
///
/// Each engine owns its field registry, exclusion rules, optional writer factory and
/// frames-to-skip setting; engines share no state with each other or with the
/// process-wide instance behind the package-level functions.
///
/// Every call is a self-contained transaction on the calling thread: fetch a fresh
/// writer, filter by level, resolve the caller, project registered fields, apply
/// exclusion rules, write.
///
/// # Example
///
/// ```
/// use rust_context_logger::backends::TestCapture;
/// use rust_context_logger::{Context, Field, Logger};
///
/// const COMPONENT: Field = Field::from_static("component");
///
/// let capture = TestCapture::new();
/// let logger = Logger::with_factory(capture.factory());
/// logger.register_field([COMPONENT]);
///
/// let ctx = Context::background().with_value(COMPONENT, "billing");
/// logger.info(&ctx, format_args!("invoice {} sent", 42));
///
/// let entries = capture.entries();
/// assert_eq!(entries[0].message, "invoice 42 sent");
/// assert_eq!(entries[0].field("component").unwrap().to_string(), "billing");
/// ```
pub struct Logger {
    registry: FieldRegistry,
    rules: ExclusionRules,
    factory: RwLock<Option<WriterFactory>>,
    frames_to_skip: AtomicUsize,
    metrics: Arc<EmissionMetrics>,
}

impl Logger {
    /// Engine writing through the process-wide default factory
    #[must_use]
    pub fn new() -> Self {
        LoggerBuilder::new().build()
    }

    /// Engine writing through `factory`
    #[must_use]
    pub fn with_factory(factory: WriterFactory) -> Self {
        LoggerBuilder::new().factory(factory).build()
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn frames_to_skip(&self) -> usize {
        self.frames_to_skip.load(Ordering::Relaxed)
    }

    /// Adjust how many frames above the engine the reported caller sits.
    ///
    /// Wrappers that add their own frame between user code and the level methods add
    /// one per layer.
    pub fn set_frames_to_skip(&self, frames: usize) {
        self.frames_to_skip.store(frames, Ordering::Relaxed);
    }

    /// Engine-local factory, if one was set
    pub fn factory(&self) -> Option<WriterFactory> {
        self.factory.read().clone()
    }

    /// Replace the engine-local factory; `None` falls back to the default factory
    pub fn set_factory(&self, factory: Option<WriterFactory>) {
        *self.factory.write() = factory;
    }

    pub fn register_field<I, F>(&self, fields: I)
    where
        I: IntoIterator<Item = F>,
        F: Into<Field>,
    {
        self.registry.register(fields.into_iter().map(Into::into));
    }

    pub fn unregister_field<'a, I>(&self, fields: I)
    where
        I: IntoIterator<Item = &'a Field>,
    {
        self.registry.unregister(fields);
    }

    /// Sorted copy of the registered fields
    pub fn registered_fields(&self) -> Vec<Field> {
        self.registry.list()
    }

    /// Register the built-in fields again, keeping any others
    pub fn register_default_fields(&self) {
        self.registry.register(Field::DEFAULTS);
    }

    /// Make the registry hold exactly the built-in fields
    pub fn reset_to_defaults(&self) {
        self.registry.reset_to_defaults();
    }

    /// Drop every call whose context holds `value` for `field`
    pub fn skip(&self, field: impl Into<Field>, value: impl Into<FieldValue>) {
        self.rules.skip(field, value);
    }

    pub fn unskip(&self, field: &Field) -> bool {
        self.rules.unskip(field)
    }

    pub fn skip_rules(&self) -> Vec<ExcludeRule> {
        self.rules.rules()
    }

    pub fn metrics(&self) -> &EmissionMetrics {
        &self.metrics
    }

    // Level methods and `emit` stay out-of-line: their frames are what
    // `frames_to_skip` counts.

    #[inline(never)]
    pub fn debug(&self, ctx: &Context, args: fmt::Arguments<'_>) {
        self.emit(ctx, LogLevel::Debug, args);
    }

    #[inline(never)]
    pub fn info(&self, ctx: &Context, args: fmt::Arguments<'_>) {
        self.emit(ctx, LogLevel::Info, args);
    }

    #[inline(never)]
    pub fn warn(&self, ctx: &Context, args: fmt::Arguments<'_>) {
        self.emit(ctx, LogLevel::Warn, args);
    }

    #[inline(never)]
    pub fn error(&self, ctx: &Context, args: fmt::Arguments<'_>) {
        self.emit(ctx, LogLevel::Error, args);
    }

    /// Writers terminate the process after a fatal entry; the call only returns when the
    /// entry was filtered or suppressed.
    #[inline(never)]
    pub fn fatal(&self, ctx: &Context, args: fmt::Arguments<'_>) {
        self.emit(ctx, LogLevel::Fatal, args);
    }

    /// Writers unwind after a panic entry; the call only returns when the entry was
    /// filtered or suppressed.
    #[inline(never)]
    pub fn panic(&self, ctx: &Context, args: fmt::Arguments<'_>) {
        self.emit(ctx, LogLevel::Panic, args);
    }

    /// Log at an arbitrary level; `Trace` is written through the writer's debug method
    #[inline(never)]
    pub fn log(&self, ctx: &Context, level: LogLevel, args: fmt::Arguments<'_>) {
        self.emit(ctx, level, args);
    }

    /// Log `error` at error level, attaching its stack trace when it carries one
    #[inline(never)]
    pub fn error_with_stack_trace(&self, ctx: &Context, error: &(dyn Error + 'static)) {
        let ctx = context_with_stack_trace(ctx, error);
        let message = error.to_string();
        self.emit(&ctx, LogLevel::Error, format_args!("{}", message));
    }

    /// Registered fields present in `ctx`, without logging anything
    pub fn field_values(&self, ctx: &Context) -> BTreeMap<Field, FieldValue> {
        self.registry
            .snapshot()
            .iter()
            .filter_map(|field| {
                ctx.value(field)
                    .filter(|value| !value.is_null())
                    .map(|value| (field.clone(), value.clone()))
            })
            .collect()
    }

    #[inline(never)]
    fn emit(&self, ctx: &Context, level: LogLevel, args: fmt::Arguments<'_>) {
        let factory = self.factory().unwrap_or_else(default_factory);
        let mut writer = factory();

        if level < writer.level() {
            self.metrics.record_filtered();
            return;
        }

        self.metrics.record_caller_lookup();
        let mut layered = ctx.clone();
        if let Some(location) = CallerLocation::capture(self.frames_to_skip()) {
            if let Some(file) = location.file {
                layered = layered.with_value(Field::SOURCE_FILE, file);
            }
            if let Some(line) = location.line {
                layered = layered.with_value(Field::SOURCE_LINE, line);
            }
            layered = layered.with_value(Field::CALLER, location.function);
        }

        let rules = self.rules.rules();
        for field in self.registry.snapshot().iter() {
            let Some(value) = layered.value(field) else {
                continue;
            };
            if value.is_null() {
                continue;
            }
            if is_suppressed(&rules, field, value) {
                self.metrics.record_suppressed();
                return;
            }
            writer.with_field(field.as_str(), value.clone());
        }

        self.metrics.record_emitted();
        match level {
            LogLevel::Trace | LogLevel::Debug => writer.debug(args),
            LogLevel::Info => writer.info(args),
            LogLevel::Warn => writer.warn(args),
            LogLevel::Error => writer.error(args),
            LogLevel::Fatal => writer.fatal(args),
            LogLevel::Panic => writer.panic(args),
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("registered_fields", &self.registry.list())
            .field("skip_rules", &self.rules.rules())
            .field("has_factory", &self.factory.read().is_some())
            .field("frames_to_skip", &self.frames_to_skip())
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_context_logger::backends::{ConsoleOptions, ConsoleWriter};
/// use rust_context_logger::{Field, LogLevel, Logger};
///
/// let logger = Logger::builder()
///     .factory(ConsoleWriter::factory(ConsoleOptions::new(LogLevel::Debug)))
///     .field(Field::from_static("request_id"))
///     .skip(Field::from_static("request_id"), "healthcheck")
///     .build();
///
/// assert_eq!(logger.registered_fields().len(), 5);
/// ```
pub struct LoggerBuilder {
    factory: Option<WriterFactory>,
    frames_to_skip: usize,
    default_fields: bool,
    fields: Vec<Field>,
    skip_rules: Vec<ExcludeRule>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            factory: None,
            frames_to_skip: DEFAULT_FRAMES_TO_SKIP,
            default_fields: true,
            fields: Vec::new(),
            skip_rules: Vec::new(),
        }
    }

    /// Set the engine-local writer factory
    #[must_use = "builder methods return a new value"]
    pub fn factory(mut self, factory: WriterFactory) -> Self {
        self.factory = Some(factory);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn frames_to_skip(mut self, frames: usize) -> Self {
        self.frames_to_skip = frames;
        self
    }

    /// Start from an empty registry instead of the built-in fields
    #[must_use = "builder methods return a new value"]
    pub fn without_default_fields(mut self) -> Self {
        self.default_fields = false;
        self
    }

    /// Register an additional field
    #[must_use = "builder methods return a new value"]
    pub fn field(mut self, field: impl Into<Field>) -> Self {
        self.fields.push(field.into());
        self
    }

    /// Add an exclusion rule
    #[must_use = "builder methods return a new value"]
    pub fn skip(mut self, field: impl Into<Field>, value: impl Into<FieldValue>) -> Self {
        self.skip_rules.push(ExcludeRule::new(field, value));
        self
    }

    pub fn build(self) -> Logger {
        let registry = if self.default_fields {
            FieldRegistry::new()
        } else {
            FieldRegistry::with_fields(std::iter::empty())
        };
        registry.register(self.fields);

        let rules = ExclusionRules::new();
        for rule in self.skip_rules {
            rules.skip(rule.field, rule.value);
        }

        Logger {
            registry,
            rules,
            factory: RwLock::new(self.factory),
            frames_to_skip: AtomicUsize::new(self.frames_to_skip),
            metrics: Arc::new(EmissionMetrics::new()),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
