//! Validator aggregator
//!
//! [`OptionsValidator`] executes a sealed rule set against a concrete
//! options instance and reduces the rule outcomes into one [`Outcome`].
//! Validation is a pure function of the instance and the sealed
//! configuration: no logging, no mutation, no I/O, no per-call state, so a
//! sealed validator is safe to share across threads.

use crate::builder::{FailureMode, PropertyEntry};
use crate::error::ValidationFailure;

// ============================================================================
// Outcome
// ============================================================================

/// Result of validating one options instance.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome {
    /// Every rule passed.
    Success,

    /// The validator was registered under a different name than the one
    /// requested; it did not run and contributes no messages.
    Skipped,

    /// At least one rule failed.
    Failure(ValidationFailure),
}

impl Outcome {
    /// Returns `true` if every rule passed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Returns `true` if the validator did not apply to the request.
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }

    /// Returns `true` if at least one rule failed.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Converts into a `Result`, treating [`Outcome::Skipped`] as ok.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationFailure`] if any rule failed.
    pub fn into_result(self) -> Result<(), ValidationFailure> {
        match self {
            Self::Success | Self::Skipped => Ok(()),
            Self::Failure(failure) => Err(failure),
        }
    }
}

// ============================================================================
// Validator
// ============================================================================

/// An immutable, sealed validator for the options type `T`.
///
/// Produced by [`ValidatorBuilder::build`](crate::builder::ValidatorBuilder::build).
/// Holds only the sealed declarations and failure mode; every call to
/// [`validate`](Self::validate) produces a fresh outcome.
pub struct OptionsValidator<T> {
    type_name: &'static str,
    name: Option<String>,
    entries: Vec<PropertyEntry<T>>,
    mode: FailureMode,
}

impl<T> OptionsValidator<T> {
    pub(crate) fn seal(entries: Vec<PropertyEntry<T>>, mode: FailureMode) -> Self {
        Self {
            type_name: short_type_name::<T>(),
            name: None,
            entries,
            mode,
        }
    }

    /// Names the validator, enabling the name-matching guard of
    /// [`validate_named`](Self::validate_named). Registries name validators
    /// after their configuration section.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The registration name, if the validator was named.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Short name of the options type this validator checks.
    #[must_use]
    pub fn type_name(&self) -> &str {
        self.type_name
    }

    /// The failure mode sealed into this validator.
    #[must_use]
    pub fn mode(&self) -> FailureMode {
        self.mode
    }

    /// Names of the declared properties, in declaration order.
    #[must_use]
    pub fn property_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Total number of rules across all properties.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.entries.iter().map(|e| e.rules.len()).sum()
    }

    /// Validates an options instance against the sealed rule set.
    ///
    /// Properties are evaluated in declaration order, each property's rules
    /// in declaration order, honoring the sealed [`FailureMode`]. Every
    /// failing rule contributes one formatted message, in detection order.
    pub fn validate(&self, options: &T) -> Outcome {
        let mut messages = Vec::new();

        'properties: for entry in &self.entries {
            for rule in &entry.rules {
                let Some(message) = rule(options) else {
                    continue;
                };
                messages.push(format!(
                    "Validation failed for {}.{} with the error: {message}",
                    self.type_name, entry.name
                ));
                match self.mode {
                    FailureMode::Continue => {}
                    FailureMode::Break => continue 'properties,
                    FailureMode::BreakAll => break 'properties,
                }
            }
        }

        if messages.is_empty() {
            Outcome::Success
        } else {
            Outcome::Failure(ValidationFailure::new(
                self.type_name,
                self.name.clone(),
                messages,
            ))
        }
    }

    /// Validates with the name-matching guard.
    ///
    /// If this validator was registered under a name and `request` does not
    /// match it, returns [`Outcome::Skipped`] without evaluating any rule.
    /// An unnamed validator applies to every request.
    pub fn validate_named(&self, request: Option<&str>, options: &T) -> Outcome {
        if let Some(expected) = self.name.as_deref() {
            if request != Some(expected) {
                return Outcome::Skipped;
            }
        }
        self.validate(options)
    }
}

/// Last path segment of `std::any::type_name`, matching how the failure
/// messages name the options type.
pub(crate) fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ValidatorBuilder;
    use crate::rules::{greater_than, not_empty};

    #[derive(Clone)]
    struct Limits {
        low: i64,
        high: i64,
        label: String,
    }

    fn sample() -> Limits {
        Limits {
            low: 5,
            high: 50,
            label: "primary".to_string(),
        }
    }

    fn validator() -> OptionsValidator<Limits> {
        ValidatorBuilder::new()
            .property("low", |l: &Limits| &l.low)
            .rule(greater_than(0))
            .property("high", |l: &Limits| &l.high)
            .rule(greater_than(10))
            .property("label", |l: &Limits| &l.label)
            .rule(not_empty())
            .build()
    }

    #[test]
    fn test_all_rules_pass() {
        assert!(validator().validate(&sample()).is_success());
    }

    #[test]
    fn test_single_failure_names_type_and_property() {
        let mut instance = sample();
        instance.high = 3;
        let Outcome::Failure(failure) = validator().validate(&instance) else {
            panic!("expected a failure outcome");
        };
        assert_eq!(failure.messages().len(), 1);
        assert_eq!(
            failure.messages()[0],
            "Validation failed for Limits.high with the error: must be greater than 10, but was 3"
        );
    }

    #[test]
    fn test_continue_mode_collects_one_message_per_failing_property() {
        let instance = Limits {
            low: -1,
            high: 2,
            label: "ok".to_string(),
        };
        let Outcome::Failure(failure) = validator().validate(&instance) else {
            panic!("expected a failure outcome");
        };
        assert_eq!(failure.messages().len(), 2);
        // Declaration order: low before high.
        assert!(failure.messages()[0].contains("Limits.low"));
        assert!(failure.messages()[1].contains("Limits.high"));
    }

    #[test]
    fn test_break_mode_stops_within_property_only() {
        let validator = ValidatorBuilder::with_mode(FailureMode::Break)
            .property("low", |l: &Limits| &l.low)
            .rule(greater_than(0))
            .rule(greater_than(100))
            .property("high", |l: &Limits| &l.high)
            .rule(greater_than(10))
            .build();
        let instance = Limits {
            low: -1,
            high: 2,
            label: String::new(),
        };
        let Outcome::Failure(failure) = validator.validate(&instance) else {
            panic!("expected a failure outcome");
        };
        // One message for `low` despite two failing rules, plus one for `high`.
        assert_eq!(failure.messages().len(), 2);
        assert!(failure.messages()[0].contains("Limits.low"));
        assert!(failure.messages()[1].contains("Limits.high"));
    }

    #[test]
    fn test_break_all_mode_stops_at_first_failure() {
        let validator = ValidatorBuilder::with_mode(FailureMode::BreakAll)
            .property("low", |l: &Limits| &l.low)
            .rule(greater_than(0))
            .property("high", |l: &Limits| &l.high)
            .rule(greater_than(10))
            .build();
        let instance = Limits {
            low: -1,
            high: 2,
            label: String::new(),
        };
        let Outcome::Failure(failure) = validator.validate(&instance) else {
            panic!("expected a failure outcome");
        };
        assert_eq!(failure.messages().len(), 1);
        assert!(failure.messages()[0].contains("Limits.low"));
    }

    #[test]
    fn test_named_validator_skips_other_names() {
        let validator = validator().with_name("limits");
        let outcome = validator.validate_named(Some("other"), &sample());
        assert!(outcome.is_skipped());
    }

    #[test]
    fn test_named_validator_skips_unnamed_request() {
        let validator = validator().with_name("limits");
        assert!(validator.validate_named(None, &sample()).is_skipped());
    }

    #[test]
    fn test_named_validator_runs_on_matching_name() {
        let validator = validator().with_name("limits");
        assert!(validator.validate_named(Some("limits"), &sample()).is_success());
    }

    #[test]
    fn test_unnamed_validator_applies_to_every_request() {
        assert!(validator().validate_named(Some("anything"), &sample()).is_success());
    }

    #[test]
    fn test_validation_is_idempotent() {
        let validator = validator();
        let mut instance = sample();
        instance.low = -3;
        assert_eq!(validator.validate(&instance), validator.validate(&instance));
    }

    #[test]
    fn test_empty_validator_always_succeeds() {
        let validator = ValidatorBuilder::<Limits>::new().build();
        assert!(validator.validate(&sample()).is_success());
    }

    #[test]
    fn test_outcome_into_result() {
        assert!(Outcome::Success.into_result().is_ok());
        assert!(Outcome::Skipped.into_result().is_ok());
        let mut instance = sample();
        instance.low = -3;
        assert!(validator().validate(&instance).into_result().is_err());
    }
}
