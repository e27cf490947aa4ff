//! Backend comparison example
//!
//! Sends the same calls through the structured (logfmt), JSON and console backends, and
//! writes JSON lines to a file.
//!
//! Run with: cargo run --example backends

use rust_context_logger::backends::{
    ConsoleOptions, ConsoleWriter, JsonEncoderConfig, JsonLogger, Sink, StructuredLogger,
};
use rust_context_logger::prelude::*;
use rust_context_logger::FormatOptions;

const COMPONENT_NAME: Field = Field::from_static("componentName");
const ASSET_NAME: Field = Field::from_static("assetName");

fn exercise(name: &str, factory: WriterFactory) {
    println!("--- {} ---", name);

    let logger = Logger::with_factory(factory);
    logger.register_field([COMPONENT_NAME, ASSET_NAME]);

    let ctx = Context::background()
        .with_value(COMPONENT_NAME, "rockets/log")
        .with_value(ASSET_NAME, format!("ExampleWith{}", name));

    logger.debug(&ctx, format_args!("this is {}", "debug"));
    logger.info(&ctx, format_args!("this is {:?}", "info"));
    logger.warn(&ctx, format_args!("this is warn"));
    logger.error(&ctx, format_args!("this is error"));
    println!();
}

fn main() -> Result<()> {
    println!("=== Rust Context Logger - Backends Example ===\n");

    let structured = StructuredLogger::new(Sink::stdout());
    structured.set_level(LogLevel::Debug);
    structured.set_options(FormatOptions {
        colors: true,
        ..FormatOptions::default()
    });
    exercise("Structured", structured.factory());

    let json = JsonLogger::new(
        JsonEncoderConfig {
            level: LogLevel::Debug,
            ..Default::default()
        },
        Sink::stdout(),
    )?;
    exercise("Json", json.factory());

    exercise(
        "Console",
        ConsoleWriter::factory(ConsoleOptions::new(LogLevel::Info)),
    );

    let path = std::env::temp_dir().join("rust_context_logger_demo.jsonl");
    let file_logger = JsonLogger::new(JsonEncoderConfig::default(), Sink::file(&path)?)?;
    exercise("JsonFile", file_logger.factory());
    println!("JSON lines appended to {}", path.display());

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
