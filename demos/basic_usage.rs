//! Basic logger usage example
//!
//! Demonstrates context fields, exclusion rules, stack traces and the package-level
//! functions, all printed by the console backend.
//!
//! Run with: cargo run --example basic_usage

use rust_context_logger::backends::{ConsoleOptions, ConsoleWriter};
use rust_context_logger::prelude::*;
use rust_context_logger::{info, set_default_factory, warn, with_stack};

const COMPONENT_NAME: Field = Field::from_static("componentName");
const ASSET_NAME: Field = Field::from_static("assetName");

fn load_asset(name: &str) -> std::result::Result<(), TracedError> {
    Err(TracedError::msg(format!("asset '{}' not found", name)))
}

fn main() -> Result<()> {
    println!("=== Rust Context Logger - Basic Usage Example ===\n");

    let logger = Logger::with_factory(ConsoleWriter::factory(ConsoleOptions::new(
        LogLevel::Debug,
    )));
    logger.register_field([COMPONENT_NAME, ASSET_NAME]);

    let ctx = Context::background()
        .with_value(COMPONENT_NAME, "rockets/log")
        .with_value(ASSET_NAME, "ExampleWithDefaultLogger");

    println!("1. Logging at different levels:");
    logger.debug(&ctx, format_args!("this is {}", "debug"));
    logger.info(&ctx, format_args!("this is {:?}", "info"));
    warn!(logger => &ctx, "this is warn");
    logger.error(&ctx, format_args!("this is error"));

    println!("\n2. Fields missing from the context are omitted:");
    let partial = Context::background().with_value(COMPONENT_NAME, "rockets/log");
    logger.info(&partial, format_args!("no asset here"));

    println!("\n3. Exclusion rules silence whole calls:");
    logger.skip(ASSET_NAME, "ExampleWithDefaultLogger");
    logger.info(&ctx, format_args!("suppressed (hidden)"));
    logger.unskip(&ASSET_NAME);
    logger.info(&ctx, format_args!("visible again"));

    println!("\n4. Errors with stack traces:");
    if let Err(err) = load_asset("fuel-tank") {
        logger.error_with_stack_trace(&ctx, &err);
    }
    let plain = std::io::Error::new(std::io::ErrorKind::NotFound, "no trace attached");
    logger.error_with_stack_trace(&ctx, &plain);
    logger.error_with_stack_trace(&ctx, &with_stack(plain));

    println!("\n5. Package-level functions:");
    set_default_factory(ConsoleWriter::factory(ConsoleOptions::new(LogLevel::Info)));
    rust_context_logger::register_field([COMPONENT_NAME]);
    info!(&ctx, "logged through the process-wide engine");

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
