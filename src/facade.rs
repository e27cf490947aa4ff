//! Package-level logging functions backed by one process-wide engine
//!
//! The process-wide engine writes through the default factory (see
//! [`set_default_factory`](crate::set_default_factory)) and reports the caller one
//! frame further up than a plain engine, since every call passes through the
//! functions in this module first.

use crate::core::{Context, ExcludeRule, Field, FieldValue, LogLevel, Logger};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::sync::OnceLock;

/// Frames between the stack walk and the user's call site for package-level calls
pub const GLOBAL_FRAMES_TO_SKIP: usize = 3;

/// The process-wide engine, created on first use
pub fn global() -> &'static Logger {
    static GLOBAL: OnceLock<Logger> = OnceLock::new();
    GLOBAL.get_or_init(|| Logger::builder().frames_to_skip(GLOBAL_FRAMES_TO_SKIP).build())
}

#[inline(never)]
pub fn debug(ctx: &Context, args: fmt::Arguments<'_>) {
    global().debug(ctx, args);
}

#[inline(never)]
pub fn info(ctx: &Context, args: fmt::Arguments<'_>) {
    global().info(ctx, args);
}

#[inline(never)]
pub fn warn(ctx: &Context, args: fmt::Arguments<'_>) {
    global().warn(ctx, args);
}

#[inline(never)]
pub fn error(ctx: &Context, args: fmt::Arguments<'_>) {
    global().error(ctx, args);
}

#[inline(never)]
pub fn fatal(ctx: &Context, args: fmt::Arguments<'_>) {
    global().fatal(ctx, args);
}

#[inline(never)]
pub fn panic(ctx: &Context, args: fmt::Arguments<'_>) {
    global().panic(ctx, args);
}

#[inline(never)]
pub fn log(ctx: &Context, level: LogLevel, args: fmt::Arguments<'_>) {
    global().log(ctx, level, args);
}

#[inline(never)]
pub fn error_with_stack_trace(ctx: &Context, error: &(dyn Error + 'static)) {
    global().error_with_stack_trace(ctx, error);
}

pub fn register_field<I, F>(fields: I)
where
    I: IntoIterator<Item = F>,
    F: Into<Field>,
{
    global().register_field(fields);
}

pub fn unregister_field<'a, I>(fields: I)
where
    I: IntoIterator<Item = &'a Field>,
{
    global().unregister_field(fields);
}

pub fn registered_fields() -> Vec<Field> {
    global().registered_fields()
}

pub fn register_default_fields() {
    global().register_default_fields();
}

pub fn reset_to_defaults() {
    global().reset_to_defaults();
}

pub fn skip(field: impl Into<Field>, value: impl Into<FieldValue>) {
    global().skip(field, value);
}

pub fn unskip(field: &Field) -> bool {
    global().unskip(field)
}

pub fn skip_rules() -> Vec<ExcludeRule> {
    global().skip_rules()
}

pub fn frames_to_skip() -> usize {
    global().frames_to_skip()
}

pub fn set_frames_to_skip(frames: usize) {
    global().set_frames_to_skip(frames);
}

pub fn field_values(ctx: &Context) -> BTreeMap<Field, FieldValue> {
    global().field_values(ctx)
}
