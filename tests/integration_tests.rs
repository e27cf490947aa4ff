//! Integration tests for the emission engine
//!
//! These tests verify:
//! - Registered fields projected in deterministic order
//! - Exclusion rules dropping whole calls
//! - Level filtering before any caller lookup
//! - Caller location through wrapper layers
//! - Stack trace attachment
//! - Engine isolation
//! - Fatal and panic termination semantics

use rust_context_logger::backends::{
    ConsoleOptions, ConsoleWriter, JsonEncoderConfig, JsonLogger, SharedBuffer, Sink,
    StructuredLogger, Terminated, TestCapture,
};
use rust_context_logger::{
    with_stack, Context, Field, FieldValue, FormatOptions, LogLevel, Logger, TimestampFormat,
    TracedError,
};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

const COMPONENT_NAME: Field = Field::from_static("componentName");
const ASSET_NAME: Field = Field::from_static("assetName");

fn context() -> Context {
    Context::background()
        .with_value(COMPONENT_NAME, "svc")
        .with_value(ASSET_NAME, "job1")
}

fn field_names(capture: &TestCapture, index: usize) -> Vec<String> {
    capture.entries()[index]
        .field_names()
        .into_iter()
        .map(String::from)
        .collect()
}

#[test]
fn test_round_trip_with_registered_fields() {
    let capture = TestCapture::new();
    let logger = Logger::with_factory(capture.factory());
    logger.register_field([COMPONENT_NAME, ASSET_NAME]);

    logger.info(&context(), format_args!("value is {:?}", "x"));

    let entries = capture.entries();
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.level, LogLevel::Info);
    assert_eq!(entry.message, "value is \"x\"");
    assert_eq!(entry.field("componentName"), Some(&FieldValue::from("svc")));
    assert_eq!(entry.field("assetName"), Some(&FieldValue::from("job1")));

    // Registry order, stack_trace absent from the context
    assert_eq!(
        field_names(&capture, 0),
        vec!["assetName", "caller", "componentName", "source_file", "source_line"]
    );
}

#[test]
fn test_skip_suppresses_entire_call() {
    let capture = TestCapture::new();
    let logger = Logger::with_factory(capture.factory());
    logger.register_field([COMPONENT_NAME, ASSET_NAME]);

    logger.skip(ASSET_NAME, "job1");
    logger.info(&context(), format_args!("value is {:?}", "x"));
    assert!(capture.is_empty());

    // Other values of the same field still pass
    let other = context().with_value(ASSET_NAME, "job2");
    logger.info(&other, format_args!("value is {:?}", "y"));
    assert_eq!(capture.len(), 1);

    assert!(logger.unskip(&ASSET_NAME));
    logger.info(&context(), format_args!("back"));
    assert_eq!(capture.len(), 2);
}

#[test]
fn test_skip_on_unregistered_field_has_no_effect() {
    let capture = TestCapture::new();
    let logger = Logger::with_factory(capture.factory());
    logger.register_field([COMPONENT_NAME]);

    logger.skip(ASSET_NAME, "job1");
    logger.info(&context(), format_args!("written"));

    assert_eq!(capture.len(), 1);
}

#[test]
fn test_skip_compares_by_variant_and_value() {
    const ATTEMPT: Field = Field::from_static("attempt");

    let capture = TestCapture::new();
    let logger = Logger::with_factory(capture.factory());
    logger.register_field([ATTEMPT]);
    logger.skip(ATTEMPT, 1i64);

    logger.info(&Context::background().with_value(ATTEMPT, 1.0), format_args!("float"));
    logger.info(&Context::background().with_value(ATTEMPT, "1"), format_args!("string"));
    logger.info(&Context::background().with_value(ATTEMPT, 1i64), format_args!("int"));

    let messages: Vec<String> = capture.entries().into_iter().map(|e| e.message).collect();
    assert_eq!(messages, vec!["float", "string"]);
}

#[test]
fn test_missing_fields_are_omitted() {
    let capture = TestCapture::new();
    let logger = Logger::with_factory(capture.factory());
    logger.register_field([COMPONENT_NAME, ASSET_NAME]);

    let ctx = Context::background().with_value(COMPONENT_NAME, "svc");
    logger.warn(&ctx, format_args!("partial"));

    let entry = &capture.entries()[0];
    assert!(entry.field("assetName").is_none());
    assert!(entry.field("componentName").is_some());
}

#[test]
fn test_below_level_skips_caller_lookup() {
    let capture = TestCapture::with_level(LogLevel::Error);
    let logger = Logger::with_factory(capture.factory());

    logger.debug(&context(), format_args!("dropped"));
    logger.info(&context(), format_args!("dropped"));
    logger.warn(&context(), format_args!("dropped"));

    assert!(capture.is_empty());
    assert_eq!(logger.metrics().caller_lookups(), 0);
    assert_eq!(logger.metrics().filtered(), 3);

    logger.error(&context(), format_args!("kept"));
    assert_eq!(capture.len(), 1);
    assert_eq!(logger.metrics().caller_lookups(), 1);
}

#[test]
fn test_caller_context_is_not_mutated() {
    let capture = TestCapture::new();
    let logger = Logger::with_factory(capture.factory());
    let ctx = context();

    logger.info(&ctx, format_args!("hello"));

    assert!(ctx.value(&Field::SOURCE_FILE).is_none());
    assert!(ctx.value(&Field::CALLER).is_none());
    assert_eq!(ctx.entries().len(), 2);
}

#[inline(never)]
fn wrapped_info(logger: &Logger, ctx: &Context, args: fmt::Arguments<'_>) {
    logger.info(ctx, args);
}

#[inline(never)]
fn doubly_wrapped_info(logger: &Logger, ctx: &Context, args: fmt::Arguments<'_>) {
    wrapped_info(logger, ctx, args);
}

fn caller_of(capture: &TestCapture, index: usize) -> String {
    capture.entries()[index]
        .field("caller")
        .map(|value| value.to_string())
        .unwrap_or_default()
}

#[test]
fn test_caller_location_reports_direct_call_site() {
    let capture = TestCapture::new();
    let logger = Logger::with_factory(capture.factory());

    let line = line!() + 1;
    logger.info(&Context::background(), format_args!("direct"));

    let entry = &capture.entries()[0];
    let file = entry.field("source_file").map(|v| v.to_string()).unwrap_or_default();
    assert!(file.ends_with("integration_tests.rs"), "{}", file);
    assert_eq!(entry.field("source_line"), Some(&FieldValue::from(line)));

    let caller = caller_of(&capture, 0);
    assert!(
        caller.ends_with("test_caller_location_reports_direct_call_site"),
        "{}",
        caller
    );
}

#[test]
fn test_caller_location_follows_frames_to_skip() {
    let capture = TestCapture::new();
    let logger = Logger::with_factory(capture.factory());

    // Default skip reports the wrapper itself
    wrapped_info(&logger, &Context::background(), format_args!("one"));
    assert!(caller_of(&capture, 0).ends_with("wrapped_info"));

    // One extra frame per wrapper layer
    logger.set_frames_to_skip(3);
    wrapped_info(&logger, &Context::background(), format_args!("two"));
    assert!(caller_of(&capture, 1).ends_with("test_caller_location_follows_frames_to_skip"));

    logger.set_frames_to_skip(4);
    doubly_wrapped_info(&logger, &Context::background(), format_args!("three"));
    assert!(caller_of(&capture, 2).ends_with("test_caller_location_follows_frames_to_skip"));
}

#[test]
fn test_caller_fields_can_be_unregistered() {
    let capture = TestCapture::new();
    let logger = Logger::with_factory(capture.factory());
    logger.unregister_field(&[Field::SOURCE_FILE, Field::SOURCE_LINE, Field::CALLER]);

    logger.info(&Context::background(), format_args!("anonymous"));

    assert!(capture.entries()[0].fields.is_empty());

    logger.register_default_fields();
    logger.info(&Context::background(), format_args!("located"));
    assert_eq!(capture.entries()[1].fields.len(), 3);
}

#[derive(Debug)]
struct QuotaError;

impl fmt::Display for QuotaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "quota exceeded")
    }
}

impl std::error::Error for QuotaError {}

#[test]
fn test_error_with_stack_trace() {
    let capture = TestCapture::new();
    let logger = Logger::with_factory(capture.factory());

    let traced = with_stack(QuotaError);
    logger.error_with_stack_trace(&context(), &traced);

    let entry = &capture.entries()[0];
    assert_eq!(entry.level, LogLevel::Error);
    assert_eq!(entry.message, "quota exceeded");
    let trace = entry.field("stack_trace").map(|v| v.to_string()).unwrap_or_default();
    assert!(trace.starts_with("quota exceeded"));
    assert!(trace.lines().count() > 1);
}

#[test]
fn test_error_without_stack_trace() {
    let capture = TestCapture::new();
    let logger = Logger::with_factory(capture.factory());

    logger.error_with_stack_trace(&context(), &QuotaError);

    let entries = capture.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].level, LogLevel::Error);
    assert!(entries[0].field("stack_trace").is_none());
}

#[derive(Debug)]
struct ServiceError {
    source: TracedError,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "service unavailable")
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

#[test]
fn test_stack_trace_found_along_source_chain() {
    let capture = TestCapture::new();
    let logger = Logger::with_factory(capture.factory());

    let err = ServiceError {
        source: TracedError::msg("connection refused"),
    };
    logger.error_with_stack_trace(&Context::background(), &err);

    let entry = &capture.entries()[0];
    assert_eq!(entry.message, "service unavailable");
    let trace = entry.field("stack_trace").map(|v| v.to_string()).unwrap_or_default();
    assert!(trace.starts_with("connection refused"));
}

#[test]
fn test_engines_are_isolated() {
    let first_capture = TestCapture::new();
    let second_capture = TestCapture::new();
    let first = Logger::with_factory(first_capture.factory());
    let second = Logger::with_factory(second_capture.factory());

    first.register_field([ASSET_NAME]);
    first.skip(ASSET_NAME, "job1");

    assert!(!second.registered_fields().contains(&ASSET_NAME));
    assert!(second.skip_rules().is_empty());

    first.info(&context(), format_args!("suppressed"));
    second.info(&context(), format_args!("written"));

    assert!(first_capture.is_empty());
    assert_eq!(second_capture.len(), 1);
}

#[test]
fn test_reset_to_defaults() {
    let logger = Logger::new();
    logger.register_field([COMPONENT_NAME, ASSET_NAME]);
    logger.unregister_field(&[Field::CALLER]);

    logger.reset_to_defaults();

    assert_eq!(logger.registered_fields(), {
        let mut defaults = Field::DEFAULTS.to_vec();
        defaults.sort();
        defaults
    });
}

#[test]
fn test_fatal_terminates_after_writing() {
    let capture = TestCapture::new();
    let logger = Logger::with_factory(capture.factory());

    let payload = catch_unwind(AssertUnwindSafe(|| {
        logger.fatal(&context(), format_args!("cannot start: {}", "port in use"));
    }))
    .unwrap_err();

    let terminated = payload.downcast_ref::<Terminated>().cloned();
    assert_eq!(
        terminated,
        Some(Terminated {
            level: LogLevel::Fatal,
            message: "cannot start: port in use".to_string(),
        })
    );
    assert_eq!(capture.entries()[0].level, LogLevel::Fatal);
}

#[test]
fn test_suppressed_fatal_returns() {
    let capture = TestCapture::new();
    let logger = Logger::with_factory(capture.factory());
    logger.register_field([ASSET_NAME]);
    logger.skip(ASSET_NAME, "job1");

    logger.fatal(&context(), format_args!("silenced"));
    logger.panic(&context(), format_args!("silenced"));

    assert!(capture.is_empty());
    assert_eq!(logger.metrics().suppressed(), 2);
}

#[test]
fn test_panic_unwinds_after_writing() {
    let capture = TestCapture::new();
    let logger = Logger::with_factory(capture.factory());

    let result = catch_unwind(AssertUnwindSafe(|| {
        logger.panic(&context(), format_args!("invariant broken"));
    }));

    assert!(result.is_err());
    assert_eq!(capture.entries()[0].level, LogLevel::Panic);
}

#[test]
fn test_log_injection_prevention() {
    let capture = TestCapture::new();
    let logger = Logger::with_factory(capture.factory());

    let malicious_message = "User login\nERROR [2024-10-17] Fake error injected\nINFO Continuation";
    logger.info(&Context::background(), format_args!("{}", malicious_message));

    let message = &capture.entries()[0].message;
    assert!(message.contains("\\n"));
    assert!(!message.contains('\n'));
}

#[test]
fn test_structured_backend_end_to_end() {
    let buffer = SharedBuffer::new();
    let structured = StructuredLogger::new(Sink::buffer(&buffer));
    structured.set_options(FormatOptions::plain());
    structured.set_level(LogLevel::Info);

    let logger = Logger::builder()
        .factory(structured.factory())
        .without_default_fields()
        .field(COMPONENT_NAME)
        .field(ASSET_NAME)
        .build();

    logger.debug(&context(), format_args!("hidden"));
    logger.warn(&context(), format_args!("this is warn"));

    assert_eq!(
        buffer.lines(),
        vec!["level=warning msg=\"this is warn\" assetName=job1 componentName=svc"]
    );
}

#[test]
fn test_unknown_timestamp_specifier_does_not_break_logging() {
    let buffer = SharedBuffer::new();
    let structured = StructuredLogger::new(Sink::buffer(&buffer));
    structured.set_options(FormatOptions {
        timestamp: Some(TimestampFormat::Custom("%Q".to_string())),
        colors: false,
    });
    let logger = Logger::builder()
        .factory(structured.factory())
        .without_default_fields()
        .build();

    let result = catch_unwind(AssertUnwindSafe(|| {
        logger.info(&Context::background(), format_args!("still written"));
    }));

    assert!(result.is_ok());
    let lines = buffer.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("time="), "{}", lines[0]);
    assert!(lines[0].ends_with("level=info msg=\"still written\""), "{}", lines[0]);
}

#[test]
fn test_json_field_cannot_replace_message() {
    let buffer = SharedBuffer::new();
    let config = JsonEncoderConfig {
        timestamp: None,
        ..Default::default()
    };
    let json = JsonLogger::new(config, Sink::buffer(&buffer)).unwrap();
    let msg = Field::from_static("msg");
    let logger = Logger::builder()
        .factory(json.factory())
        .without_default_fields()
        .field(msg.clone())
        .build();

    logger.info(
        &Context::background().with_value(msg, "user-supplied"),
        format_args!("real message"),
    );

    assert_eq!(
        buffer.lines(),
        vec![r#"{"level":"info","msg":"real message","fields.msg":"user-supplied"}"#]
    );
}

#[test]
fn test_json_backend_end_to_end() {
    let buffer = SharedBuffer::new();
    let config = JsonEncoderConfig {
        level: LogLevel::Debug,
        timestamp: None,
        ..Default::default()
    };
    let json = JsonLogger::new(config, Sink::buffer(&buffer)).unwrap();

    let logger = Logger::builder()
        .factory(json.factory())
        .without_default_fields()
        .field(COMPONENT_NAME)
        .field(ASSET_NAME)
        .build();
    logger.debug(&context(), format_args!("this is {}", "debug"));

    assert_eq!(
        buffer.lines(),
        vec![r#"{"level":"debug","msg":"this is debug","assetName":"job1","componentName":"svc"}"#]
    );
}

#[test]
fn test_console_backend_end_to_end() {
    let buffer = SharedBuffer::new();
    let options = ConsoleOptions::new(LogLevel::Info).without_timestamp();
    let logger = Logger::builder()
        .factory(ConsoleWriter::factory_with_sink(options, Sink::buffer(&buffer)))
        .without_default_fields()
        .field(ASSET_NAME)
        .build();

    logger.info(&context(), format_args!("100% done"));

    assert_eq!(buffer.lines(), vec!["[INFO] [assetName=job1] 100% done"]);
}
