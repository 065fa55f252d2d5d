//! Options registry
//!
//! [`OptionsRegistry`] is the host-facing surface: it ties sealed validators
//! to named sections of a [`ConfigSource`], resolves typed instances lazily
//! with a single-use memoization (bind + validate exactly once per
//! type/section pair), and runs an eager startup sweep that aggregates every
//! failing type into one report. The registry is the only layer that emits
//! `tracing` diagnostics; the validators themselves stay pure.

use crate::builder::{FailureMode, ValidatorBuilder};
use crate::error::{AggregateValidationFailure, ConfigError, StartupError};
use crate::source::ConfigSource;
use crate::validator::{OptionsValidator, Outcome, short_type_name};

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

// ============================================================================
// Erased Registration
// ============================================================================

/// One registered (options type, section) pair with its sealed validator,
/// erased so the registry can hold registrations of different types.
trait Registration: Send + Sync {
    /// Binds the section (defaulting when absent) and validates the bound
    /// instance, returning it type-erased on success.
    fn bind_and_validate(
        &self,
        source: &ConfigSource,
    ) -> Result<Arc<dyn Any + Send + Sync>, StartupError>;
}

struct Registered<T> {
    section: String,
    validator: OptionsValidator<T>,
}

impl<T> Registration for Registered<T>
where
    T: DeserializeOwned + Default + Send + Sync + 'static,
{
    fn bind_and_validate(
        &self,
        source: &ConfigSource,
    ) -> Result<Arc<dyn Any + Send + Sync>, StartupError> {
        tracing::debug!(
            section = %self.section,
            options = self.validator.type_name(),
            "binding and validating options section"
        );
        let options: T = source.bind_or_default(&self.section)?;
        match self.validator.validate_named(Some(&self.section), &options) {
            Outcome::Success | Outcome::Skipped => Ok(Arc::new(options)),
            Outcome::Failure(failure) => {
                tracing::warn!(
                    section = %self.section,
                    options = self.validator.type_name(),
                    errors = failure.messages().len(),
                    "options validation failed"
                );
                Err(StartupError::Validation(failure))
            }
        }
    }
}

// ============================================================================
// Registry
// ============================================================================

type Key = (TypeId, String);
type CachedInstance = Arc<dyn Any + Send + Sync>;

/// Registry of options types bound to configuration sections.
///
/// Registrations are kept in declaration order. Resolved instances are
/// memoized per (type, section) pair; the cache is invalidated only by an
/// explicit [`reload`](Self::reload).
pub struct OptionsRegistry {
    source: ConfigSource,
    registrations: IndexMap<Key, Box<dyn Registration>>,
    duplicate: Option<(String, String)>,
    cache: Mutex<HashMap<Key, CachedInstance>>,
}

impl OptionsRegistry {
    /// Creates a registry over the given configuration source.
    #[must_use]
    pub fn new(source: ConfigSource) -> Self {
        Self {
            source,
            registrations: IndexMap::new(),
            duplicate: None,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Registers an options type for a configuration section with the
    /// default failure mode ([`FailureMode::Continue`]).
    ///
    /// `configure` receives a fresh builder and declares the properties and
    /// rules; the registry names the sealed validator after the section so
    /// the name-matching guard applies. Returns the registry for chaining.
    #[must_use]
    pub fn register<T, F>(self, section: &str, configure: F) -> Self
    where
        T: DeserializeOwned + Default + Send + Sync + 'static,
        F: FnOnce(ValidatorBuilder<T>) -> OptionsValidator<T>,
    {
        self.register_with_mode(section, configure, FailureMode::Continue)
    }

    /// Registers an options type for a configuration section with an
    /// explicit failure mode.
    ///
    /// Registering the same (type, section) pair twice is setup-time misuse;
    /// it is recorded here and surfaced as
    /// [`ConfigError::DuplicateRegistration`] by the next resolution or
    /// sweep, so a long registration chain fails loudly but not mid-chain.
    #[must_use]
    pub fn register_with_mode<T, F>(
        mut self,
        section: &str,
        configure: F,
        mode: FailureMode,
    ) -> Self
    where
        T: DeserializeOwned + Default + Send + Sync + 'static,
        F: FnOnce(ValidatorBuilder<T>) -> OptionsValidator<T>,
    {
        let key = (TypeId::of::<T>(), section.to_string());
        if self.registrations.contains_key(&key) {
            if self.duplicate.is_none() {
                self.duplicate =
                    Some((short_type_name::<T>().to_string(), section.to_string()));
            }
            return self;
        }
        let validator = configure(ValidatorBuilder::with_mode(mode)).with_name(section);
        self.registrations.insert(
            key,
            Box::new(Registered {
                section: section.to_string(),
                validator,
            }),
        );
        self
    }

    /// Number of registered (type, section) pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Returns `true` if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Resolves a validated instance of `T` bound from `section`.
    ///
    /// The first call binds the section (a missing section binds
    /// `T::default()`), validates it, and memoizes the result; later calls
    /// return the cached instance without re-validating.
    ///
    /// # Errors
    ///
    /// [`StartupError::Config`] for setup-time defects (unregistered pair,
    /// duplicate registration, unbindable section) and
    /// [`StartupError::Validation`] when a rule failed.
    pub fn get<T>(&self, section: &str) -> Result<Arc<T>, StartupError>
    where
        T: DeserializeOwned + Default + Send + Sync + 'static,
    {
        self.check_registrations()?;
        let key = (TypeId::of::<T>(), section.to_string());

        if let Some(cached) = self.cache_lock().get(&key).cloned() {
            if let Ok(typed) = cached.downcast::<T>() {
                return Ok(typed);
            }
        }

        let registration =
            self.registrations
                .get(&key)
                .ok_or_else(|| ConfigError::NotRegistered {
                    type_name: short_type_name::<T>().to_string(),
                    section: section.to_string(),
                })?;
        let instance = registration.bind_and_validate(&self.source)?;
        let typed = Arc::clone(&instance)
            .downcast::<T>()
            .map_err(|_| ConfigError::NotRegistered {
                type_name: short_type_name::<T>().to_string(),
                section: section.to_string(),
            })?;
        self.cache_lock().insert(key, instance);
        Ok(typed)
    }

    /// Validates every registered section eagerly, in registration order.
    ///
    /// Successfully validated instances are memoized, so later
    /// [`get`](Self::get) calls do not repeat the work.
    ///
    /// # Errors
    ///
    /// Setup-time [`ConfigError`]s abort the sweep immediately. Rule
    /// failures are collected across all registrations: exactly one failing
    /// type yields [`StartupError::Validation`], two or more yield
    /// [`StartupError::Aggregate`] with every per-type failure preserved.
    pub fn sweep(&self) -> Result<(), StartupError> {
        self.check_registrations()?;
        tracing::debug!(
            registrations = self.registrations.len(),
            "running startup validation sweep"
        );

        let mut failures = Vec::new();
        for (key, registration) in &self.registrations {
            match registration.bind_and_validate(&self.source) {
                Ok(instance) => {
                    self.cache_lock().insert(key.clone(), instance);
                }
                Err(StartupError::Validation(failure)) => failures.push(failure),
                Err(other) => return Err(other),
            }
        }

        match failures.len() {
            0 => Ok(()),
            1 => Err(StartupError::Validation(failures.remove(0))),
            _ => Err(StartupError::Aggregate(AggregateValidationFailure::new(
                failures,
            ))),
        }
    }

    /// Replaces the configuration source and clears the memoization cache.
    ///
    /// This is the only invalidation path: every section is re-bound and
    /// re-validated on its next resolution.
    pub fn reload(&mut self, source: ConfigSource) {
        self.source = source;
        self.cache_lock().clear();
    }

    fn check_registrations(&self) -> Result<(), ConfigError> {
        match &self.duplicate {
            Some((type_name, section)) => Err(ConfigError::DuplicateRegistration {
                type_name: type_name.clone(),
                section: section.clone(),
            }),
            None => Ok(()),
        }
    }

    fn cache_lock(&self) -> MutexGuard<'_, HashMap<Key, CachedInstance>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for OptionsRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionsRegistry")
            .field("registrations", &self.registrations.len())
            .finish_non_exhaustive()
    }
}
