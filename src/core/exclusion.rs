//! Exclusion rules: drop a whole emission when a field carries a given value

use super::field::Field;
use super::log_context::FieldValue;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// A `(field, value)` pair that silences every log call whose context holds `value`
/// for `field`.
///
/// A match suppresses the entire emission, not just the field. Use it to silence a noisy
/// identity, e.g. every entry tagged with a given request id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludeRule {
    pub field: Field,
    pub value: FieldValue,
}

impl ExcludeRule {
    pub fn new(field: impl Into<Field>, value: impl Into<FieldValue>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// True when this rule applies to `field` and its sentinel equals `value`
    pub fn matches(&self, field: &Field, value: &FieldValue) -> bool {
        self.field == *field && self.value == *value
    }
}

/// Ordered rule set with at most one rule per field
#[derive(Debug, Default)]
pub struct ExclusionRules {
    rules: RwLock<Vec<ExcludeRule>>,
}

impl ExclusionRules {
    pub fn new() -> Self {
        Self {
            rules: RwLock::new(Vec::new()),
        }
    }

    /// Insert a rule, or replace the sentinel of the rule already held for `field`
    pub fn skip(&self, field: impl Into<Field>, value: impl Into<FieldValue>) {
        let rule = ExcludeRule::new(field, value);
        let mut rules = self.rules.write();
        match rules.iter_mut().find(|existing| existing.field == rule.field) {
            Some(existing) => existing.value = rule.value,
            None => rules.push(rule),
        }
    }

    /// Remove the rule for `field`, returning whether one existed
    pub fn unskip(&self, field: &Field) -> bool {
        let mut rules = self.rules.write();
        let before = rules.len();
        rules.retain(|rule| rule.field != *field);
        rules.len() != before
    }

    /// Copy of the rules in insertion order
    pub fn rules(&self) -> Vec<ExcludeRule> {
        self.rules.read().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.read().is_empty()
    }
}

/// Evaluate a rule snapshot against one extracted field value
pub(crate) fn is_suppressed(rules: &[ExcludeRule], field: &Field, value: &FieldValue) -> bool {
    rules.iter().any(|rule| rule.matches(field, value))
}
