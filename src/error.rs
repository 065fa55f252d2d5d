//! Error types for `optvet`
//!
//! Two families of failure are kept strictly apart: [`ConfigError`] covers
//! setup-time misuse (unparseable sources, unbindable sections, bad rule
//! patterns) and is always fatal, while [`ValidationFailure`] and
//! [`AggregateValidationFailure`] carry rule outcomes and are ordinary,
//! inspectable values. [`StartupError`] is the host-facing sum of both.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Configuration Errors
// ============================================================================

/// Setup-time configuration errors.
///
/// These cover every failure mode that is a defect in how the host wired
/// things up rather than in the configuration values themselves. They are
/// surfaced immediately and never folded into a validation report.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Source text could not be parsed
    #[error("parse error: {message}")]
    Parse {
        /// Error message from the parser
        message: String,
    },

    /// Reading a configuration file failed
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path to the configuration file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// File extension is not a recognized configuration format
    #[error("unsupported configuration format: {path}")]
    UnsupportedFormat {
        /// Path to the offending file
        path: PathBuf,
    },

    /// A section exists but could not be deserialized into the options type
    #[error("failed to bind section '{section}': {message}")]
    Bind {
        /// Dotted path of the section
        section: String,
        /// Error message from the deserializer
        message: String,
    },

    /// A pattern rule was built from an invalid regular expression
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The rejected pattern
        pattern: String,
        /// Error message from the regex compiler
        message: String,
    },

    /// The same options type was registered twice for one section
    #[error("duplicate registration of {type_name} for section '{section}'")]
    DuplicateRegistration {
        /// Short name of the options type
        type_name: String,
        /// Dotted path of the section
        section: String,
    },

    /// An options type was requested that was never registered
    #[error("{type_name} is not registered for section '{section}'")]
    NotRegistered {
        /// Short name of the options type
        type_name: String,
        /// Dotted path of the section
        section: String,
    },
}

// ============================================================================
// Validation Failures
// ============================================================================

/// The validation outcome for one options type with at least one failed rule.
///
/// Carries the options type name, the section the validator was registered
/// under (if any), and one formatted message per failed rule, in the order
/// the failures were detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation of {type_name} failed with {} error(s): {}", messages.len(), messages.join("; "))]
pub struct ValidationFailure {
    type_name: String,
    section: Option<String>,
    messages: Vec<String>,
}

impl ValidationFailure {
    pub(crate) fn new(
        type_name: impl Into<String>,
        section: Option<String>,
        messages: Vec<String>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            section,
            messages,
        }
    }

    /// Short name of the options type that failed.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Section the validator was registered under, if it was named.
    #[must_use]
    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }

    /// Formatted failure messages, one per failed rule, in detection order.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

/// Combined failures across several options types validated together.
///
/// Produced only when two or more types fail a startup sweep. Every per-type
/// [`ValidationFailure`] is preserved; nothing is collapsed to the first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} options type(s) failed validation", failures.len())]
pub struct AggregateValidationFailure {
    failures: Vec<ValidationFailure>,
}

impl AggregateValidationFailure {
    pub(crate) fn new(failures: Vec<ValidationFailure>) -> Self {
        Self { failures }
    }

    /// The per-type failures, in registration order.
    #[must_use]
    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }

    /// Number of options types that failed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Returns `true` if the aggregate holds no failures.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Iterates over the per-type failures.
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationFailure> {
        self.failures.iter()
    }
}

impl<'a> IntoIterator for &'a AggregateValidationFailure {
    type Item = &'a ValidationFailure;
    type IntoIter = std::slice::Iter<'a, ValidationFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.iter()
    }
}

// ============================================================================
// Startup Errors
// ============================================================================

/// Host-facing error for lazy resolution and the startup sweep.
///
/// The host can match on the shape: a single failing options type arrives as
/// [`StartupError::Validation`], several arrive as [`StartupError::Aggregate`],
/// and wiring defects arrive as [`StartupError::Config`].
#[derive(Debug, Error)]
pub enum StartupError {
    /// Setup-time configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Exactly one options type failed validation
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    /// Two or more options types failed validation
    #[error(transparent)]
    Aggregate(#[from] AggregateValidationFailure),
}
