// Field validation shared by every draft -> record conversion
//
// A `Validator` records every failing field instead of stopping at the first,
// and hands back normalized values (trimmed, parsed) as it goes. Callers build
// the validated record only after `finish()` succeeds.

use crate::domain::enums::WireEnum;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// A single failed rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub message: String,
}

/// All failed rules of one validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    issues: Vec<ValidationIssue>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a single-issue error
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// First message recorded for `field`
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.issues
            .iter()
            .find(|issue| issue.field == field)
            .map(|issue| issue.message.as_str())
    }

    pub fn has(&self, field: &str) -> bool {
        self.message_for(field).is_some()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .issues
            .iter()
            .map(|issue| format!("{}: {}", issue.field, issue.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Character-length rule for a text field
#[derive(Debug, Clone, Copy)]
pub struct TextRule {
    pub min: usize,
    pub max: usize,
    pub trim: bool,
    pub too_short: &'static str,
    pub too_long: &'static str,
}

impl TextRule {
    /// Trimmed before the length check; the trimmed value is kept
    pub const fn trimmed(
        min: usize,
        max: usize,
        too_short: &'static str,
        too_long: &'static str,
    ) -> Self {
        Self {
            min,
            max,
            trim: true,
            too_short,
            too_long,
        }
    }

    /// Checked and stored exactly as given
    pub const fn verbatim(
        min: usize,
        max: usize,
        too_short: &'static str,
        too_long: &'static str,
    ) -> Self {
        Self {
            min,
            max,
            trim: false,
            too_short,
            too_long,
        }
    }
}

/// Inclusive numeric range rule
#[derive(Debug, Clone, Copy)]
pub struct RangeRule {
    pub min: f64,
    pub max: f64,
    pub too_small: &'static str,
    pub too_large: &'static str,
}

impl RangeRule {
    pub const fn new(min: f64, max: f64, too_small: &'static str, too_large: &'static str) -> Self {
        Self {
            min,
            max,
            too_small,
            too_large,
        }
    }
}

#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationErrors,
    failed: HashSet<&'static str>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&mut self, field: &'static str, message: impl Into<String>) {
        self.failed.insert(field);
        self.errors.push(field, message);
    }

    /// True if no rule has failed for `field` so far
    pub fn is_valid(&self, field: &str) -> bool {
        !self.failed.contains(field)
    }

    pub fn text(&mut self, field: &'static str, value: &str, rule: &TextRule) -> String {
        let value = if rule.trim { value.trim() } else { value };
        let len = value.chars().count();
        if len < rule.min {
            self.fail(field, rule.too_short);
        } else if len > rule.max {
            self.fail(field, rule.too_long);
        }
        value.to_string()
    }

    pub fn optional_text(
        &mut self,
        field: &'static str,
        value: Option<&str>,
        rule: &TextRule,
    ) -> Option<String> {
        value.map(|v| self.text(field, v, rule))
    }

    pub fn range(&mut self, field: &'static str, value: f64, rule: &RangeRule) -> f64 {
        if !value.is_finite() {
            self.fail(field, "Expected a finite number");
        } else if value < rule.min {
            self.fail(field, rule.too_small);
        } else if value > rule.max {
            self.fail(field, rule.too_large);
        }
        value
    }

    pub fn optional_range(
        &mut self,
        field: &'static str,
        value: Option<f64>,
        rule: &RangeRule,
    ) -> Option<f64> {
        value.map(|v| self.range(field, v, rule))
    }

    /// Integer range; bounds come from the rule
    pub fn int_range(&mut self, field: &'static str, value: i64, rule: &RangeRule) -> i64 {
        let as_float = value as f64;
        if as_float < rule.min {
            self.fail(field, rule.too_small);
        } else if as_float > rule.max {
            self.fail(field, rule.too_large);
        }
        value
    }

    /// Foreign key ids must be positive
    pub fn id(&mut self, field: &'static str, value: i64, message: &'static str) -> i64 {
        if value < 1 {
            self.fail(field, message);
        }
        value
    }

    /// Enum membership; absent values take the enum default
    pub fn choice<T>(&mut self, field: &'static str, value: Option<&str>) -> T
    where
        T: WireEnum + Default,
    {
        match value {
            None => T::default(),
            Some(raw) => self.required_choice(field, raw).unwrap_or_default(),
        }
    }

    /// Enum membership with no default
    pub fn required_choice<T: WireEnum>(&mut self, field: &'static str, value: &str) -> Option<T> {
        match value.parse::<T>() {
            Ok(v) => Some(v),
            Err(_) => {
                self.fail(
                    field,
                    format!("Invalid option: expected one of {}", T::expected()),
                );
                None
            }
        }
    }

    pub fn matches(
        &mut self,
        field: &'static str,
        value: &str,
        pattern: &regex::Regex,
        message: &'static str,
    ) {
        if !pattern.is_match(value) {
            self.fail(field, message);
        }
    }

    pub fn datetime(
        &mut self,
        field: &'static str,
        value: &str,
        message: &'static str,
    ) -> Option<DateTime<Utc>> {
        match parse_timestamp(value) {
            Some(ts) => Some(ts),
            None => {
                self.fail(field, message);
                None
            }
        }
    }

    pub fn optional_datetime(
        &mut self,
        field: &'static str,
        value: Option<&str>,
        message: &'static str,
    ) -> Option<DateTime<Utc>> {
        value.and_then(|v| self.datetime(field, v, message))
    }

    /// Cross-field rule: `end` must be strictly after `start`.
    /// Skipped while either field already failed its own rule.
    pub fn date_order(
        &mut self,
        start_field: &'static str,
        start: Option<DateTime<Utc>>,
        end_field: &'static str,
        end: Option<DateTime<Utc>>,
        message: &'static str,
    ) {
        if !self.is_valid(start_field) || !self.is_valid(end_field) {
            return;
        }
        if let (Some(start), Some(end)) = (start, end) {
            if end <= start {
                self.fail(end_field, message);
            }
        }
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// RFC 3339 timestamp with an explicit offset, normalized to UTC
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}
