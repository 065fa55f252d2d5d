//! Rule primitives for property validation
//!
//! A [`Rule`] pairs a predicate over a property value with a failure-message
//! factory. Rules are pure and synchronous; the message may embed the
//! offending value so failure reports read like `must be greater than 10,
//! but was 5`. Constructors cover the common comparisons; [`Rule::new`]
//! accepts an arbitrary predicate with an explicit message.

use crate::error::ConfigError;
use regex::Regex;
use std::fmt;
use std::fmt::Display;
use std::ops::RangeInclusive;

// ============================================================================
// Rule
// ============================================================================

/// A single validation rule over a property value of type `V`.
///
/// Evaluation never mutates the value. A rule whose predicate panics is a
/// defect in the rule definition; the panic propagates as-is.
pub struct Rule<V> {
    check: Box<dyn Fn(&V) -> bool + Send + Sync>,
    message: Box<dyn Fn(&V) -> String + Send + Sync>,
}

impl<V> Rule<V> {
    /// Creates a rule from a predicate and a fixed failure message.
    pub fn new<P>(predicate: P, message: impl Into<String>) -> Self
    where
        P: Fn(&V) -> bool + Send + Sync + 'static,
    {
        let message = message.into();
        Self {
            check: Box::new(predicate),
            message: Box::new(move |_| message.clone()),
        }
    }

    /// Creates a rule whose failure message is computed from the value.
    pub fn with_message_fn<P, M>(predicate: P, message: M) -> Self
    where
        P: Fn(&V) -> bool + Send + Sync + 'static,
        M: Fn(&V) -> String + Send + Sync + 'static,
    {
        Self {
            check: Box::new(predicate),
            message: Box::new(message),
        }
    }

    /// Returns `true` if the value satisfies the rule.
    #[must_use]
    pub fn is_satisfied_by(&self, value: &V) -> bool {
        (self.check)(value)
    }

    /// Evaluates the rule, returning the failure message if it fails.
    #[must_use]
    pub fn evaluate(&self, value: &V) -> Option<String> {
        if (self.check)(value) {
            None
        } else {
            Some((self.message)(value))
        }
    }
}

impl<V> fmt::Debug for Rule<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").finish_non_exhaustive()
    }
}

// ============================================================================
// Comparison Rules
// ============================================================================

/// The value must be strictly greater than `limit`.
pub fn greater_than<V>(limit: V) -> Rule<V>
where
    V: PartialOrd + Display + Clone + Send + Sync + 'static,
{
    let shown = limit.clone();
    Rule::with_message_fn(
        move |value: &V| *value > limit,
        move |value| format!("must be greater than {shown}, but was {value}"),
    )
}

/// The value must be strictly less than `limit`.
pub fn less_than<V>(limit: V) -> Rule<V>
where
    V: PartialOrd + Display + Clone + Send + Sync + 'static,
{
    let shown = limit.clone();
    Rule::with_message_fn(
        move |value: &V| *value < limit,
        move |value| format!("must be less than {shown}, but was {value}"),
    )
}

/// The value must fall within `range`, bounds included.
pub fn in_range<V>(range: RangeInclusive<V>) -> Rule<V>
where
    V: PartialOrd + Display + Clone + Send + Sync + 'static,
{
    let start = range.start().clone();
    let end = range.end().clone();
    Rule::with_message_fn(
        move |value: &V| range.contains(value),
        move |value| format!("must be between {start} and {end}, but was {value}"),
    )
}

// ============================================================================
// String Rules
// ============================================================================

/// The string must not be empty.
pub fn not_empty<V>() -> Rule<V>
where
    V: AsRef<str> + Send + Sync + 'static,
{
    Rule::new(
        |value: &V| !value.as_ref().is_empty(),
        "must not be empty",
    )
}

/// The string must be at least `min` characters long.
pub fn min_len<V>(min: usize) -> Rule<V>
where
    V: AsRef<str> + Send + Sync + 'static,
{
    Rule::with_message_fn(
        move |value: &V| value.as_ref().chars().count() >= min,
        move |value| {
            format!(
                "must be at least {min} characters, but was {}",
                value.as_ref().chars().count()
            )
        },
    )
}

/// The string must be at most `max` characters long.
pub fn max_len<V>(max: usize) -> Rule<V>
where
    V: AsRef<str> + Send + Sync + 'static,
{
    Rule::with_message_fn(
        move |value: &V| value.as_ref().chars().count() <= max,
        move |value| {
            format!(
                "must be at most {max} characters, but was {}",
                value.as_ref().chars().count()
            )
        },
    )
}

/// The string must match the regular expression `pattern`.
///
/// An invalid pattern is a setup-time error, reported when the rule is
/// built rather than when it first runs.
pub fn matches<V>(pattern: &str) -> Result<Rule<V>, ConfigError>
where
    V: AsRef<str> + Send + Sync + 'static,
{
    let regex = Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;
    let shown = pattern.to_string();
    Ok(Rule::with_message_fn(
        move |value: &V| regex.is_match(value.as_ref()),
        move |_| format!("must match the pattern '{shown}'"),
    ))
}
