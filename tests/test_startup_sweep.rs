//! Startup sweep across several registered options types.

use optvet::rules::greater_than;
use optvet::{ConfigError, ConfigSource, OptionsRegistry, StartupError, ValidatorBuilder};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CacheOptions {
    capacity: i64,
    ttl_seconds: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PoolOptions {
    min_idle: i64,
    max_open: i64,
}

fn two_type_registry(source: ConfigSource) -> OptionsRegistry {
    OptionsRegistry::new(source)
        .register("cache", |b: ValidatorBuilder<CacheOptions>| {
            b.property("capacity", |o: &CacheOptions| &o.capacity)
                .rule(greater_than(10))
                .build()
        })
        .register("pool", |b: ValidatorBuilder<PoolOptions>| {
            b.property("min_idle", |o: &PoolOptions| &o.min_idle)
                .rule(greater_than(5))
                .build()
        })
}

/// Both types valid: the sweep passes and later resolution reuses the work.
#[test]
fn sweep_passes_when_all_valid() {
    let source = ConfigSource::from_yaml_str(
        "\
cache:
  capacity: 128
  ttl_seconds: 60
pool:
  min_idle: 8
  max_open: 32
",
    )
    .expect("fixture should parse");
    let registry = two_type_registry(source);
    registry.sweep().expect("sweep should pass");

    let cache = registry.get::<CacheOptions>("cache").expect("should resolve");
    let pool = registry.get::<PoolOptions>("pool").expect("should resolve");
    assert_eq!(cache.capacity, 128);
    assert_eq!(pool.min_idle, 8);
}

/// Both types violate their single rule: the sweep yields an aggregate with
/// exactly one inner failure per type, each naming its own property.
#[test]
fn sweep_aggregates_every_failing_type() {
    let source = ConfigSource::from_yaml_str(
        "\
cache:
  capacity: 5
  ttl_seconds: 60
pool:
  min_idle: 3
  max_open: 10
",
    )
    .expect("fixture should parse");
    let err = two_type_registry(source)
        .sweep()
        .expect_err("both types should fail");
    let aggregate = match err {
        StartupError::Aggregate(aggregate) => aggregate,
        other => panic!("expected an aggregate failure, got {other}"),
    };

    assert_eq!(aggregate.len(), 2);
    let cache_failure = &aggregate.failures()[0];
    let pool_failure = &aggregate.failures()[1];

    assert_eq!(cache_failure.type_name(), "CacheOptions");
    assert_eq!(cache_failure.messages().len(), 1);
    assert!(cache_failure.messages()[0].contains("capacity"));

    assert_eq!(pool_failure.type_name(), "PoolOptions");
    assert_eq!(pool_failure.messages().len(), 1);
    assert!(pool_failure.messages()[0].contains("min_idle"));
}

/// Exactly one failing type arrives as the single-failure shape, not an
/// aggregate of one.
#[test]
fn sweep_single_failure_is_not_aggregated() {
    let source = ConfigSource::from_yaml_str(
        "\
cache:
  capacity: 5
  ttl_seconds: 60
pool:
  min_idle: 8
  max_open: 32
",
    )
    .expect("fixture should parse");
    let err = two_type_registry(source)
        .sweep()
        .expect_err("cache should fail");
    let failure = match err {
        StartupError::Validation(failure) => failure,
        other => panic!("expected a single validation failure, got {other}"),
    };
    assert_eq!(failure.type_name(), "CacheOptions");
}

/// Missing sections bind default instances whose values then fail the
/// declared rules; absence is never a parse or bind error.
#[test]
fn missing_sections_fail_rules_not_binding() {
    let err = two_type_registry(ConfigSource::empty())
        .sweep()
        .expect_err("defaults should fail both rules");
    let aggregate = match err {
        StartupError::Aggregate(aggregate) => aggregate,
        other => panic!("expected an aggregate failure, got {other}"),
    };
    assert_eq!(aggregate.len(), 2);
    for failure in &aggregate {
        assert_eq!(failure.messages().len(), 1);
    }
}

/// A section that cannot bind aborts the sweep immediately; wiring defects
/// are fatal and never mixed into the aggregated rule report.
#[test]
fn malformed_section_aborts_sweep() {
    let source = ConfigSource::from_yaml_str(
        "\
cache:
  capacity: five
pool:
  min_idle: 3
",
    )
    .expect("fixture should parse");
    let err = two_type_registry(source)
        .sweep()
        .expect_err("unbindable cache section should abort");
    assert!(matches!(
        err,
        StartupError::Config(ConfigError::Bind { .. })
    ));
}

/// File-based sources work end to end.
#[test]
fn sweep_from_yaml_file() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("app.yaml");
    std::fs::write(
        &path,
        "cache:\n  capacity: 64\n  ttl_seconds: 30\npool:\n  min_idle: 6\n  max_open: 12\n",
    )
    .expect("failed to write fixture");

    let source = ConfigSource::from_file(&path).expect("file should load");
    let registry = two_type_registry(source);
    registry.sweep().expect("sweep should pass");
    let cache = registry.get::<CacheOptions>("cache").expect("should resolve");
    assert_eq!(cache.capacity, 64);
}

/// Unknown file extensions are rejected before any parsing is attempted.
#[test]
fn unsupported_extension_rejected() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("app.toml");
    std::fs::write(&path, "capacity = 64\n").expect("failed to write fixture");

    let err = ConfigSource::from_file(&path).expect_err("toml should be rejected");
    assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
}

/// Reloading the source re-binds and re-validates on the next resolution.
#[test]
fn reload_revalidates_sections() {
    let valid = ConfigSource::from_yaml_str(
        "cache:\n  capacity: 64\n  ttl_seconds: 30\npool:\n  min_idle: 6\n  max_open: 12\n",
    )
    .expect("fixture should parse");
    let mut registry = two_type_registry(valid);
    registry.sweep().expect("sweep should pass");

    registry.reload(
        ConfigSource::from_yaml_str(
            "cache:\n  capacity: 2\n  ttl_seconds: 30\npool:\n  min_idle: 6\n  max_open: 12\n",
        )
        .expect("fixture should parse"),
    );
    let err = registry
        .get::<CacheOptions>("cache")
        .expect_err("reloaded capacity should fail");
    assert!(matches!(err, StartupError::Validation(_)));
}
