//! Validator builder
//!
//! [`ValidatorBuilder`] accumulates an ordered list of (property, rule-set)
//! declarations for one options type, then seals them into an immutable
//! [`OptionsValidator`](crate::validator::OptionsValidator). The "current
//! property" of the fluent surface is a typed [`PropertyRules`] handle, so
//! attaching a rule of the wrong value type is a compile error, and the
//! builder cannot be touched again once `build()` has consumed it.

use crate::rules::Rule;
use crate::validator::OptionsValidator;
use std::sync::Arc;

/// One rule erased to operate on the whole options instance: extracts the
/// property value through its selector and returns the rule message on
/// failure.
pub(crate) type ErasedRule<T> = Box<dyn Fn(&T) -> Option<String> + Send + Sync>;

/// A property declaration: stable name plus its attached rules, in
/// declaration order.
pub(crate) struct PropertyEntry<T> {
    pub(crate) name: String,
    pub(crate) rules: Vec<ErasedRule<T>>,
}

// ============================================================================
// Failure Mode
// ============================================================================

/// Policy governing rule evaluation after a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// Evaluate every rule of every property and collect every failure.
    #[default]
    Continue,

    /// Stop evaluating the current property's remaining rules after its
    /// first failure, then proceed with the next property.
    Break,

    /// Stop the entire validation pass on the first failure anywhere.
    BreakAll,
}

// ============================================================================
// Builder
// ============================================================================

/// Fluent, ordered accumulation of property validation declarations for the
/// options type `T`.
///
/// Single-writer by construction: `build()` takes the builder by value, so a
/// sealed validator can never observe later mutation.
pub struct ValidatorBuilder<T> {
    entries: Vec<PropertyEntry<T>>,
    mode: FailureMode,
}

impl<T: 'static> ValidatorBuilder<T> {
    /// Creates a builder with [`FailureMode::Continue`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_mode(FailureMode::Continue)
    }

    /// Creates a builder with the given failure mode.
    ///
    /// The mode is set once for the whole builder and applies to every
    /// property declared on it.
    #[must_use]
    pub fn with_mode(mode: FailureMode) -> Self {
        Self {
            entries: Vec::new(),
            mode,
        }
    }

    /// The failure mode the sealed validator will use.
    #[must_use]
    pub fn mode(&self) -> FailureMode {
        self.mode
    }

    /// Declares a property to validate, identified by a stable name and a
    /// pure accessor into `T`. Returns a handle scoped to that property for
    /// attaching rules.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty or whitespace. A nameless property cannot
    /// produce a readable failure message, and the mistake should surface at
    /// configuration time rather than in a validation report.
    #[must_use]
    pub fn property<V, S>(self, name: &str, selector: S) -> PropertyRules<T, V>
    where
        V: 'static,
        S: Fn(&T) -> &V + Send + Sync + 'static,
    {
        assert!(
            !name.trim().is_empty(),
            "property name must not be empty"
        );
        PropertyRules {
            builder: self,
            name: name.to_string(),
            selector: Arc::new(selector),
            rules: Vec::new(),
        }
    }

    /// Seals the accumulated declarations into an immutable validator.
    ///
    /// A builder with no properties seals into a validator that always
    /// succeeds.
    #[must_use]
    pub fn build(self) -> OptionsValidator<T> {
        OptionsValidator::seal(self.entries, self.mode)
    }
}

impl<T: 'static> Default for ValidatorBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Property Context
// ============================================================================

/// Handle scoped to one declared property of `T` with value type `V`.
///
/// Rules attached through this handle apply to the property it was created
/// for; declaring the next property (or sealing) closes the context and
/// hands the accumulated rules back to the builder.
pub struct PropertyRules<T, V> {
    builder: ValidatorBuilder<T>,
    name: String,
    selector: Arc<dyn Fn(&T) -> &V + Send + Sync>,
    rules: Vec<ErasedRule<T>>,
}

impl<T: 'static, V: 'static> PropertyRules<T, V> {
    /// Attaches one rule to the current property. Multiple calls append;
    /// earlier rules are never replaced.
    #[must_use]
    pub fn rule(mut self, rule: Rule<V>) -> Self {
        let selector = Arc::clone(&self.selector);
        self.rules
            .push(Box::new(move |options: &T| rule.evaluate((*selector)(options))));
        self
    }

    /// Attaches a custom predicate with an explicit failure message.
    #[must_use]
    pub fn must<P>(self, predicate: P, message: impl Into<String>) -> Self
    where
        P: Fn(&V) -> bool + Send + Sync + 'static,
    {
        self.rule(Rule::new(predicate, message))
    }

    /// Closes the current property context and declares the next property.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty or whitespace, as
    /// [`ValidatorBuilder::property`] does.
    #[must_use]
    pub fn property<W, S>(self, name: &str, selector: S) -> PropertyRules<T, W>
    where
        W: 'static,
        S: Fn(&T) -> &W + Send + Sync + 'static,
    {
        self.finish().property(name, selector)
    }

    /// Closes the current property context and seals the builder.
    #[must_use]
    pub fn build(self) -> OptionsValidator<T> {
        self.finish().build()
    }

    fn finish(mut self) -> ValidatorBuilder<T> {
        self.builder.entries.push(PropertyEntry {
            name: self.name,
            rules: self.rules,
        });
        self.builder
    }
}
