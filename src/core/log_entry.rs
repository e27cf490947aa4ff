//! Log entry structure handed to line formats and capturing backends

use super::error::Result;
use super::log_context::FieldValue;
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Fields in the order the engine attached them
    pub fields: Vec<(String, FieldValue)>,
}

impl LogEntry {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// to prevent attackers from injecting fake log entries.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: LogLevel, message: String) -> Self {
        Self {
            level,
            message: Self::sanitize_message(&message),
            timestamp: Utc::now(),
            fields: Vec::new(),
        }
    }

    pub fn with_fields(mut self, fields: Vec<(String, FieldValue)>) -> Self {
        self.fields = fields;
        self
    }

    /// Value attached under `key`, the last attachment winning
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .rev()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Fields sorted by key with later duplicates replacing earlier ones
    pub fn sorted_fields(&self) -> Vec<(&str, &FieldValue)> {
        let mut sorted: std::collections::BTreeMap<&str, &FieldValue> =
            std::collections::BTreeMap::new();
        for (name, value) in &self.fields {
            sorted.insert(name.as_str(), value);
        }
        sorted.into_iter().collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_is_sanitized() {
        let entry = LogEntry::new(LogLevel::Info, "line one\nERROR fake".to_string());
        assert_eq!(entry.message, "line one\\nERROR fake");
    }

    #[test]
    fn test_field_lookup_and_sorting() {
        let entry = LogEntry::new(LogLevel::Info, "msg".to_string()).with_fields(vec![
            ("component".to_string(), FieldValue::from("svc")),
            ("asset".to_string(), FieldValue::from("job1")),
            ("component".to_string(), FieldValue::from("svc2")),
        ]);

        assert_eq!(entry.field("component"), Some(&FieldValue::from("svc2")));
        assert!(entry.field("missing").is_none());
        let keys: Vec<&str> = entry.sorted_fields().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["asset", "component"]);
    }

    #[test]
    fn test_to_json() {
        let entry = LogEntry::new(LogLevel::Warn, "disk low".to_string())
            .with_fields(vec![("free_mb".to_string(), FieldValue::Int(12))]);
        let json = entry.to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["level"], "warn");
        assert_eq!(parsed["message"], "disk low");
    }
}
