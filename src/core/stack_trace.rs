//! Errors that carry a captured stack trace

use super::field::Field;
use super::log_context::Context;
use backtrace::Backtrace;
use std::error::Error;
use std::fmt;

/// Errors able to render the stack captured when they were created
pub trait StackTrace {
    /// Multi-line rendering: the error message followed by one line per frame
    fn stack_trace(&self) -> String;
}

/// Wraps an error together with the stack at the point of wrapping.
///
/// # Example
///
/// ```
/// use rust_context_logger::{StackTrace, TracedError};
///
/// let err = TracedError::msg("disk quota exceeded");
/// assert_eq!(err.to_string(), "disk quota exceeded");
/// assert!(err.stack_trace().lines().count() > 1);
/// ```
pub struct TracedError {
    inner: Box<dyn Error + Send + Sync + 'static>,
    backtrace: Backtrace,
}

impl TracedError {
    pub fn new<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            inner: Box::new(error),
            backtrace: Backtrace::new(),
        }
    }

    /// Build a traced error from a plain message
    pub fn msg(message: impl fmt::Display) -> Self {
        Self {
            inner: message.to_string().into(),
            backtrace: Backtrace::new(),
        }
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    pub fn into_inner(self) -> Box<dyn Error + Send + Sync + 'static> {
        self.inner
    }
}

/// Attach the current stack to `error`
pub fn with_stack<E>(error: E) -> TracedError
where
    E: Error + Send + Sync + 'static,
{
    TracedError::new(error)
}

impl StackTrace for TracedError {
    fn stack_trace(&self) -> String {
        format!("{}\n{:?}", self.inner, self.backtrace)
    }
}

impl fmt::Display for TracedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl fmt::Debug for TracedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracedError")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl Error for TracedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.inner.source()
    }
}

/// Find the first traced error along the `source` chain and render its stack
pub fn find_stack_trace(error: &(dyn Error + 'static)) -> Option<String> {
    std::iter::successors(Some(error), |&err| err.source())
        .find_map(|err| err.downcast_ref::<TracedError>())
        .map(|traced| traced.stack_trace())
}

/// Layer the stack trace of `error`, if it carries one, under [`Field::STACK_TRACE`]
pub fn context_with_stack_trace(ctx: &Context, error: &(dyn Error + 'static)) -> Context {
    match find_stack_trace(error) {
        Some(trace) => ctx.with_value(Field::STACK_TRACE, trace),
        None => ctx.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Outer(TracedError);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "outer failure")
        }
    }

    impl Error for Outer {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_traced_error_renders_frames() {
        let err = with_stack(std::io::Error::other("broken pipe"));
        let trace = err.stack_trace();
        assert!(trace.starts_with("broken pipe\n"));
        assert!(trace.lines().count() > 2);
    }

    #[test]
    fn test_find_stack_trace_walks_sources() {
        let err = Outer(TracedError::msg("inner failure"));
        let trace = find_stack_trace(&err).expect("trace found in source chain");
        assert!(trace.starts_with("inner failure"));
    }

    #[test]
    fn test_plain_error_has_no_trace() {
        let err = std::io::Error::other("plain");
        assert!(find_stack_trace(&err).is_none());
    }

    #[test]
    fn test_context_with_stack_trace() {
        let base = Context::background();

        let traced = context_with_stack_trace(&base, &TracedError::msg("failed"));
        assert!(traced.value(&Field::STACK_TRACE).is_some());
        assert!(base.value(&Field::STACK_TRACE).is_none());

        let plain = context_with_stack_trace(&base, &std::io::Error::other("failed"));
        assert!(plain.value(&Field::STACK_TRACE).is_none());
    }
}
