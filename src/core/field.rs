//! Field identities used as context keys and as emitted entry keys

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Name of a context value that may be projected into log entries.
///
/// Fields compare, hash and order by their name, so two fields built from the same text
/// are the same field.
///
/// # Example
///
/// ```
/// use rust_context_logger::Field;
///
/// const COMPONENT: Field = Field::from_static("component");
///
/// assert_eq!(COMPONENT, Field::new(String::from("component")));
/// assert_eq!(COMPONENT.as_str(), "component");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Field(Cow<'static, str>);

impl Field {
    /// Source file of the log call site
    pub const SOURCE_FILE: Field = Field::from_static("source_file");
    /// Source line of the log call site
    pub const SOURCE_LINE: Field = Field::from_static("source_line");
    /// Fully-qualified function name of the log call site
    pub const CALLER: Field = Field::from_static("caller");
    /// Multi-line stack trace attached by `error_with_stack_trace`
    pub const STACK_TRACE: Field = Field::from_static("stack_trace");

    /// Fields every engine registers at construction
    pub const DEFAULTS: [Field; 4] = [
        Field::SOURCE_FILE,
        Field::SOURCE_LINE,
        Field::CALLER,
        Field::STACK_TRACE,
    ];

    pub const fn from_static(name: &'static str) -> Self {
        Field(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Field(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Field {
    fn from(name: &'static str) -> Self {
        Field::from_static(name)
    }
}

impl From<String> for Field {
    fn from(name: String) -> Self {
        Field(Cow::Owned(name))
    }
}

impl AsRef<str> for Field {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
