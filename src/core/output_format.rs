//! Line formats used by the reference backends
//!
//! - Bracketed: `[INFO] [asset=job1][component=svc] message` (console and test writers)
//! - Logfmt: `level=info msg="message" asset=job1` (structured writer)
//! - Json: `{"level":"info","msg":"message","asset":"job1"}` (JSON writer)

use super::log_context::FieldValue;
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};

/// Output format for log entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Level tag, bracketed fields sorted by key, then the message
    #[default]
    Bracketed,

    /// key=value pairs, fields sorted by key
    Logfmt,

    /// One JSON object per line, fields in attachment order
    Json,
}

/// Presentation switches shared by the line formats
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// `None` disables the timestamp entirely
    pub timestamp: Option<TimestampFormat>,
    /// Color the level token (logfmt only, requires the `color` feature)
    pub colors: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            timestamp: Some(TimestampFormat::Iso8601),
            colors: false,
        }
    }
}

impl FormatOptions {
    /// Options without timestamp or colors, for reproducible output
    pub fn plain() -> Self {
        Self {
            timestamp: None,
            colors: false,
        }
    }
}

impl OutputFormat {
    /// Format a log entry according to this output format
    pub fn format(&self, entry: &LogEntry, options: &FormatOptions) -> String {
        match self {
            OutputFormat::Bracketed => format_bracketed(entry, options),
            OutputFormat::Logfmt => format_logfmt(entry, options),
            OutputFormat::Json => format_json(entry, options),
        }
    }
}

fn format_bracketed(entry: &LogEntry, options: &FormatOptions) -> String {
    let mut line = String::new();
    if let Some(ref timestamp) = options.timestamp {
        line.push_str(&timestamp.format(&entry.timestamp));
        line.push(' ');
    }
    line.push('[');
    line.push_str(entry.level.to_str());
    line.push(']');

    let fields = bracket_fields(entry);
    if !fields.is_empty() {
        line.push(' ');
        line.push_str(&fields);
    }

    line.push(' ');
    line.push_str(&entry.message);
    line
}

/// `[k=v][k=v]` with keys sorted
pub fn bracket_fields(entry: &LogEntry) -> String {
    entry
        .sorted_fields()
        .into_iter()
        .map(|(key, value)| format!("[{}={}]", key, value))
        .collect()
}

fn format_logfmt(entry: &LogEntry, options: &FormatOptions) -> String {
    let mut parts = Vec::new();

    if let Some(ref timestamp) = options.timestamp {
        parts.push(format!(
            "time={}",
            escape_logfmt_value(&timestamp.format(&entry.timestamp))
        ));
    }

    parts.push(format!("level={}", level_token(entry.level, options.colors)));

    // Message is always quoted
    parts.push(format!("msg={}", quote_logfmt_value(&entry.message)));

    for (key, value) in entry.sorted_fields() {
        let formatted_value = match value {
            FieldValue::String(s) => escape_logfmt_value(s),
            FieldValue::Int(i) => i.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Null => "null".to_string(),
        };
        parts.push(format!("{}={}", escape_logfmt_key(key), formatted_value));
    }

    parts.join(" ")
}

/// Level names of the key/value format; `warn` is spelled out as `warning`
pub fn logfmt_level_name(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Warn => "warning",
        other => other.as_lowercase(),
    }
}

#[cfg(feature = "color")]
fn level_token(level: LogLevel, colors: bool) -> String {
    use colored::Colorize;
    if colors {
        logfmt_level_name(level)
            .color(level.color_code())
            .to_string()
    } else {
        logfmt_level_name(level).to_string()
    }
}

#[cfg(not(feature = "color"))]
fn level_token(level: LogLevel, _colors: bool) -> String {
    logfmt_level_name(level).to_string()
}

/// Key names of the JSON line format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonKeys {
    pub level: String,
    pub time: String,
    pub message: String,
}

impl Default for JsonKeys {
    fn default() -> Self {
        Self {
            level: "level".to_string(),
            time: "ts".to_string(),
            message: "msg".to_string(),
        }
    }
}

fn format_json(entry: &LogEntry, options: &FormatOptions) -> String {
    format_json_with(entry, &JsonKeys::default(), options)
}

/// JSON line with custom key names: level, optional time, message, then fields in
/// attachment order
pub fn format_json_with(entry: &LogEntry, keys: &JsonKeys, options: &FormatOptions) -> String {
    let mut json_obj = serde_json::Map::new();

    json_obj.insert(
        keys.level.clone(),
        serde_json::Value::String(entry.level.as_lowercase().to_string()),
    );

    if let Some(ref timestamp) = options.timestamp {
        json_obj.insert(keys.time.clone(), timestamp.to_json_value(&entry.timestamp));
    }

    json_obj.insert(
        keys.message.clone(),
        serde_json::Value::String(entry.message.clone()),
    );

    // Fields never replace the level, time or message entries
    for (key, value) in &entry.fields {
        let reserved = *key == keys.level
            || *key == keys.message
            || (options.timestamp.is_some() && *key == keys.time);
        let key = if reserved {
            format!("fields.{}", key)
        } else {
            key.clone()
        };
        json_obj.insert(key, value.to_json_value());
    }

    serde_json::to_string(&serde_json::Value::Object(json_obj)).unwrap_or_default()
}

/// Escape a logfmt key (remove spaces and special chars)
fn escape_logfmt_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || *c == '.')
        .collect()
}

/// Escape a logfmt value (quote if it contains spaces, quotes, `=` or control chars)
fn escape_logfmt_value(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c == ' ' || c == '"' || c == '=' || c.is_control());
    if needs_quotes {
        quote_logfmt_value(value)
    } else {
        value.to_string()
    }
}

/// Quote a logfmt value
fn quote_logfmt_value(value: &str) -> String {
    format!(
        "\"{}\"",
        value
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    )
}
