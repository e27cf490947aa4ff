//! Logging macros for ergonomic log message formatting.
//!
//! Every macro takes the context first, then a format string and its arguments, the
//! same way `println!` does. Prefix the context with `logger =>` to log through a
//! specific engine; without it the process-wide engine is used.
//!
//! # Examples
//!
//! ```
//! use rust_context_logger::backends::TestCapture;
//! use rust_context_logger::{info, Context, Logger};
//!
//! let capture = TestCapture::new();
//! let logger = Logger::with_factory(capture.factory());
//! let ctx = Context::background();
//!
//! // Basic logging
//! info!(logger => &ctx, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger => &ctx, "Server listening on port {}", port);
//!
//! assert_eq!(capture.len(), 2);
//! ```

/// Log a message at the given level.
///
/// # Examples
///
/// ```
/// # use rust_context_logger::backends::TestCapture;
/// # use rust_context_logger::{Context, LogLevel, Logger};
/// # let capture = TestCapture::new();
/// # let logger = Logger::with_factory(capture.factory());
/// # let ctx = Context::background();
/// use rust_context_logger::log;
/// log!(logger => LogLevel::Info, &ctx, "Simple message");
/// log!(logger => LogLevel::Error, &ctx, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr => $level:expr, $ctx:expr, $($arg:tt)+) => {
        $logger.log($ctx, $level, format_args!($($arg)+))
    };
    ($level:expr, $ctx:expr, $($arg:tt)+) => {
        $crate::facade::log($ctx, $level, format_args!($($arg)+))
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use rust_context_logger::backends::TestCapture;
/// # use rust_context_logger::{Context, Logger};
/// # let capture = TestCapture::new();
/// # let logger = Logger::with_factory(capture.factory());
/// # let ctx = Context::background();
/// use rust_context_logger::debug;
/// debug!(logger => &ctx, "Debug information");
/// debug!(logger => &ctx, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr => $ctx:expr, $($arg:tt)+) => {
        $logger.debug($ctx, format_args!($($arg)+))
    };
    ($ctx:expr, $($arg:tt)+) => {
        $crate::facade::debug($ctx, format_args!($($arg)+))
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use rust_context_logger::backends::TestCapture;
/// # use rust_context_logger::{Context, Logger};
/// # let capture = TestCapture::new();
/// # let logger = Logger::with_factory(capture.factory());
/// # let ctx = Context::background();
/// use rust_context_logger::info;
/// info!(logger => &ctx, "Application started");
/// info!(logger => &ctx, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr => $ctx:expr, $($arg:tt)+) => {
        $logger.info($ctx, format_args!($($arg)+))
    };
    ($ctx:expr, $($arg:tt)+) => {
        $crate::facade::info($ctx, format_args!($($arg)+))
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use rust_context_logger::backends::TestCapture;
/// # use rust_context_logger::{Context, Logger};
/// # let capture = TestCapture::new();
/// # let logger = Logger::with_factory(capture.factory());
/// # let ctx = Context::background();
/// use rust_context_logger::warn;
/// warn!(logger => &ctx, "Low disk space");
/// warn!(logger => &ctx, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr => $ctx:expr, $($arg:tt)+) => {
        $logger.warn($ctx, format_args!($($arg)+))
    };
    ($ctx:expr, $($arg:tt)+) => {
        $crate::facade::warn($ctx, format_args!($($arg)+))
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_context_logger::backends::TestCapture;
/// # use rust_context_logger::{Context, Logger};
/// # let capture = TestCapture::new();
/// # let logger = Logger::with_factory(capture.factory());
/// # let ctx = Context::background();
/// use rust_context_logger::error;
/// error!(logger => &ctx, "Failed to connect to database");
/// error!(logger => &ctx, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr => $ctx:expr, $($arg:tt)+) => {
        $logger.error($ctx, format_args!($($arg)+))
    };
    ($ctx:expr, $($arg:tt)+) => {
        $crate::facade::error($ctx, format_args!($($arg)+))
    };
}

/// Log a fatal-level message; the writer terminates the process afterwards.
///
/// # Examples
///
/// ```no_run
/// # use rust_context_logger::{Context, Logger};
/// # let logger = Logger::new();
/// # let ctx = Context::background();
/// use rust_context_logger::fatal;
/// fatal!(logger => &ctx, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr => $ctx:expr, $($arg:tt)+) => {
        $logger.fatal($ctx, format_args!($($arg)+))
    };
    ($ctx:expr, $($arg:tt)+) => {
        $crate::facade::fatal($ctx, format_args!($($arg)+))
    };
}

/// Log a panic-level message; the writer unwinds afterwards.
///
/// # Examples
///
/// ```should_panic
/// # use rust_context_logger::{Context, Logger};
/// # let logger = Logger::new();
/// # let ctx = Context::background();
/// use rust_context_logger::panic_log;
/// panic_log!(logger => &ctx, "Invariant violated: {}", "negative balance");
/// ```
#[macro_export]
macro_rules! panic_log {
    ($logger:expr => $ctx:expr, $($arg:tt)+) => {
        $logger.panic($ctx, format_args!($($arg)+))
    };
    ($ctx:expr, $($arg:tt)+) => {
        $crate::facade::panic($ctx, format_args!($($arg)+))
    };
}
