//! OpenTelemetry tracing with file-based export.
//!
//! ```text
//! tracing spans → tracing-opentelemetry → SDK provider → FileSpanExporter → JSON lines
//! ```
//!
//! Spans land in `$XDG_DATA_HOME/scrolldex/scrolldex-otlp.json` unless
//! `trace_file` is configured. The file rotates by size and keeps three
//! timestamped backups.
//!
//! ```rust,no_run
//! use scrolldex::observability::init_tracing;
//! use scrolldex::Config;
//!
//! let config = Config {
//!     trace_level: Some("scrolldex=debug".to_string()),
//!     ..Config::default()
//! };
//! let trace_file = init_tracing(&config)?;
//! tracing::info!(path = %trace_file.display(), "tracing ready");
//! # Ok::<(), scrolldex::CatalogError>(())
//! ```

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use init::{init_tracing, trace_file_path};

/// `service.name` resource attribute and instrumentation scope.
pub(crate) const SERVICE_NAME: &str = "scrolldex";
