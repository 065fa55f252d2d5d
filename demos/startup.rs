//! Startup validation walkthrough: two options types bound from one YAML
//! document, validated in a single sweep before the application uses them.
//!
//! Run with `cargo run --example startup`. Lower `pool.max_open` below 10
//! (or blank out `server.name`) to see the aggregated failure report.

use optvet::rules::{greater_than, not_empty};
use optvet::{ConfigSource, FailureMode, OptionsRegistry, StartupError, ValidatorBuilder};
use serde::Deserialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ServerOptions {
    name: String,
    port: u16,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PoolOptions {
    min_idle: u32,
    max_open: u32,
}

const CONFIG: &str = "\
server:
  name: edge-1
  port: 8080
pool:
  min_idle: 4
  max_open: 32
";

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let source = match ConfigSource::from_yaml_str(CONFIG) {
        Ok(source) => source,
        Err(e) => {
            error!(error = %e, "configuration did not parse");
            std::process::exit(2);
        }
    };

    let registry = OptionsRegistry::new(source)
        .register_with_mode(
            "server",
            |b: ValidatorBuilder<ServerOptions>| {
                b.property("name", |o: &ServerOptions| &o.name)
                    .rule(not_empty())
                    .property("port", |o: &ServerOptions| &o.port)
                    .rule(greater_than(0))
                    .build()
            },
            FailureMode::Break,
        )
        .register("pool", |b: ValidatorBuilder<PoolOptions>| {
            b.property("min_idle", |o: &PoolOptions| &o.min_idle)
                .rule(greater_than(0))
                .property("max_open", |o: &PoolOptions| &o.max_open)
                .rule(greater_than(10))
                .build()
        });

    match registry.sweep() {
        Ok(()) => {
            if let Ok(server) = registry.get::<ServerOptions>("server") {
                info!(name = %server.name, port = server.port, "server options validated");
            }
            if let Ok(pool) = registry.get::<PoolOptions>("pool") {
                info!(min_idle = pool.min_idle, max_open = pool.max_open, "pool options validated");
            }
        }
        // Exactly one options type failed.
        Err(StartupError::Validation(failure)) => {
            for message in failure.messages() {
                error!("{message}");
            }
            error!(%failure, "startup validation failed");
            std::process::exit(2);
        }
        // Several options types failed; every per-type report is preserved.
        Err(StartupError::Aggregate(aggregate)) => {
            for failure in &aggregate {
                for message in failure.messages() {
                    error!("{message}");
                }
            }
            error!(%aggregate, "startup validation failed");
            std::process::exit(2);
        }
        Err(StartupError::Config(e)) => {
            error!(error = %e, "configuration error");
            std::process::exit(2);
        }
    }
}
