//! Declarative field validation.
//!
//! A rule table (`&[FieldRules]`) is evaluated against a raw JSON object. All
//! fields are checked independently and every failing rule contributes its
//! message, so callers get the full picture in one response. The only effectful
//! rule is [`Check::Unique`], which is answered by an injected [`UniqueLookup`].

mod rules;

pub use rules::{Check, FieldRules, Rule};

use std::collections::BTreeMap;
use std::fmt;

use axum::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

/// Raw request input: field name to untyped value.
pub type Input = Map<String, Value>;

/// Answers uniqueness questions against persisted data.
#[async_trait]
pub trait UniqueLookup: Send + Sync {
    /// Whether any record other than `ignore_id` holds `value` in `column`.
    async fn value_exists(
        &self,
        column: &str,
        value: &str,
        ignore_id: Option<i64>,
    ) -> anyhow::Result<bool>;
}

/// Field name to the ordered messages of every rule it failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.fields().collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ValidateError {
    #[error("{0}")]
    Invalid(ValidationErrors),
    #[error("uniqueness lookup failed: {0}")]
    Lookup(anyhow::Error),
}

/// Declared fields that passed every rule, with their normalised string values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validated(BTreeMap<&'static str, String>);

impl Validated {
    pub fn take(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Trims strings and maps blank values to `None`.
fn normalise(value: Option<&Value>) -> Option<Value> {
    match value? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| Value::String(trimmed.to_string()))
        }
        other if rules::is_blank(other) => None,
        other => Some(other.clone()),
    }
}

/// Runs `table` over `input`.
///
/// A blank field reports only its `required` message. A present field runs
/// every rule in order. Uniqueness is checked with `ignore_id` exempted, only
/// for string values, and only when the field's earlier rules all passed.
/// Fields not named in `table` are dropped.
pub async fn validate<L>(
    input: &Input,
    table: &[FieldRules],
    lookup: &L,
    ignore_id: Option<i64>,
) -> Result<Validated, ValidateError>
where
    L: UniqueLookup + ?Sized,
{
    let mut errors = ValidationErrors::default();
    let mut values = BTreeMap::new();

    for field in table {
        let Some(value) = normalise(input.get(field.field)) else {
            if let Some(rule) = field.required() {
                errors.add(field.field, rule.message);
            }
            continue;
        };

        let mut field_ok = true;
        for rule in field.rules {
            let passed = match rule.check {
                // Storage is only consulted for a value that passed every
                // earlier rule.
                Check::Unique(_) if !field_ok => true,
                Check::Unique(column) => match value.as_str() {
                    Some(s) => !lookup
                        .value_exists(column, s, ignore_id)
                        .await
                        .map_err(ValidateError::Lookup)?,
                    None => true,
                },
                check => check.passes(&value),
            };
            if !passed {
                field_ok = false;
                errors.add(field.field, rule.message);
            }
        }

        if field_ok {
            if let Value::String(s) = value {
                values.insert(field.field, s);
            }
        }
    }

    if errors.is_empty() {
        Ok(Validated(values))
    } else {
        Err(ValidateError::Invalid(errors))
    }
}
