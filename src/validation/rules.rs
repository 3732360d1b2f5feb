use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    // Requires a dotted domain, so `ann@x` is rejected even though RFC 5322
    // allows it.
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref DIGITS_RE: Regex = Regex::new(r"^[0-9]+$").unwrap();
}

/// A single constraint on a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Present, not null, not an empty string or array.
    Required,
    String,
    Email,
    /// Upper bound on the number of characters.
    Max(usize),
    /// Lower bound on the number of characters.
    Min(usize),
    /// ASCII digits only.
    Digits,
    /// Membership in a closed, case-sensitive set.
    In(&'static [&'static str]),
    /// No other record holds this value in the given column.
    /// Evaluated by the engine against storage, never by [`Check::passes`].
    Unique(&'static str),
}

impl Check {
    /// Pure evaluation of every check except [`Check::Unique`].
    ///
    /// Length and digit checks read numbers through their decimal text, so
    /// `5551234567` has ten characters and is all digits. Other non-strings
    /// pass length checks and are left to the `String` check to reject.
    pub fn passes(&self, value: &Value) -> bool {
        match self {
            Check::Required => !is_blank(value),
            Check::String => value.is_string(),
            Check::Email => value.as_str().is_some_and(|s| EMAIL_RE.is_match(s)),
            Check::Max(max) => as_text(value).map_or(true, |s| s.chars().count() <= *max),
            Check::Min(min) => as_text(value).map_or(true, |s| s.chars().count() >= *min),
            Check::Digits => as_text(value).is_some_and(|s| DIGITS_RE.is_match(&s)),
            Check::In(allowed) => value.as_str().is_some_and(|s| allowed.contains(&s)),
            Check::Unique(_) => true,
        }
    }
}

/// A check paired with the message reported when it fails.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub check: Check,
    pub message: &'static str,
}

impl Rule {
    pub const fn new(check: Check, message: &'static str) -> Self {
        Self { check, message }
    }
}

/// Ordered rules for one input field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRules {
    pub field: &'static str,
    pub rules: &'static [Rule],
}

impl FieldRules {
    pub fn required(&self) -> Option<&Rule> {
        self.rules.iter().find(|r| r.check == Check::Required)
    }
}

fn as_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        _ => None,
    }
}

pub(crate) fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
