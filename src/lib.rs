//! `optvet` - declarative startup validation for strongly-typed
//! configuration options.
//!
//! A host declares per-property rules for its options types through a fluent
//! [`ValidatorBuilder`], binds each type to a named section of a
//! [`ConfigSource`], and asks the [`OptionsRegistry`] to either resolve
//! instances lazily (validated once, memoized) or run an eager startup
//! [`sweep`](OptionsRegistry::sweep). Rule failures come back as structured
//! [`ValidationFailure`] values with one formatted message per failed rule;
//! when several options types fail together, every per-type failure is
//! preserved in an [`AggregateValidationFailure`].
//!
//! ```
//! use optvet::{ConfigSource, OptionsRegistry, ValidatorBuilder};
//! use optvet::rules::greater_than;
//! use serde::Deserialize;
//!
//! #[derive(Debug, Default, Deserialize)]
//! #[serde(default)]
//! struct ServerOptions {
//!     port: u16,
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = ConfigSource::from_yaml_str("server:\n  port: 8080\n")?;
//! let registry = OptionsRegistry::new(source).register(
//!     "server",
//!     |b: ValidatorBuilder<ServerOptions>| {
//!         b.property("port", |o: &ServerOptions| &o.port)
//!             .rule(greater_than(0))
//!             .build()
//!     },
//! );
//!
//! registry.sweep()?;
//! let server = registry.get::<ServerOptions>("server")?;
//! assert_eq!(server.port, 8080);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod error;
pub mod registry;
pub mod rules;
pub mod source;
pub mod validator;

pub use builder::{FailureMode, PropertyRules, ValidatorBuilder};
pub use error::{AggregateValidationFailure, ConfigError, StartupError, ValidationFailure};
pub use registry::OptionsRegistry;
pub use rules::Rule;
pub use source::ConfigSource;
pub use validator::{OptionsValidator, Outcome};
