//! Subscriber setup: `tracing` spans → OpenTelemetry → OTLP JSON file.

use std::path::PathBuf;

use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::{tracer, SERVICE_NAME};
use crate::config::Config;
use crate::domain::error::Result;
use crate::infrastructure::{expand_tilde, get_data_dir};

const TRACE_FILE_NAME: &str = "scrolldex-otlp.json";

/// Where spans are written: `trace_file` from the config, or the data
/// directory.
#[must_use]
pub fn trace_file_path(config: &Config) -> PathBuf {
    config
        .trace_file
        .as_deref()
        .map_or_else(|| get_data_dir().join(TRACE_FILE_NAME), |path| PathBuf::from(expand_tilde(path)))
}

/// Installs the global subscriber and returns the trace file path.
///
/// The filter comes from `RUST_LOG` when set, then `trace_level`, then
/// `info`. Calling this again after a subscriber is installed leaves the first
/// one in place.
///
/// # Errors
///
/// Returns [`CatalogError::Io`](crate::domain::CatalogError::Io) when the
/// trace file's directory cannot be created.
pub fn init_tracing(config: &Config) -> Result<PathBuf> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(config.trace_level.as_deref().unwrap_or("info"))
    });

    let trace_file = trace_file_path(config);
    if let Some(dir) = trace_file.parent() {
        std::fs::create_dir_all(dir)?;
    }

    let resource = Resource::new(vec![
        KeyValue::new("service.name", SERVICE_NAME),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);
    let provider = tracer::file_tracer_provider(trace_file.clone(), resource);
    let layer = OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME));

    if tracing_subscriber::registry().with(filter).with(layer).try_init().is_err() {
        tracing::debug!("global subscriber already installed");
    }
    Ok(trace_file)
}
