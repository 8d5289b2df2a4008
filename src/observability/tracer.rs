//! Tracer provider backed by a span exporter that writes to a local file.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::future::{self, BoxFuture};
use opentelemetry::trace::TraceError;
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::{Config as TraceConfig, TracerProvider};

use super::file_writer::RotatingFile;
use super::span_formatter::OtlpJsonFormatter;

/// Writes each export batch as one OTLP JSON line.
#[derive(Debug)]
struct FileSpanExporter {
    file: RotatingFile,
    formatter: OtlpJsonFormatter,
    closed: AtomicBool,
}

impl SpanExporter for FileSpanExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        if self.closed.load(Ordering::SeqCst) {
            return Box::pin(future::ready(Err(TraceError::from("trace file exporter is shut down"))));
        }

        let line = self.formatter.format_batch(&batch).to_string();
        let result = self
            .file
            .append_line(&line)
            .map_err(|e| TraceError::from(format!("writing {}: {e}", self.file.path().display())));
        Box::pin(future::ready(result))
    }

    fn shutdown(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    fn set_resource(&mut self, resource: &Resource) {
        self.formatter = OtlpJsonFormatter::new(resource.clone(), super::SERVICE_NAME);
    }
}

/// Builds a provider that exports every finished span to `trace_file`.
pub fn file_tracer_provider(trace_file: PathBuf, resource: Resource) -> TracerProvider {
    let exporter = FileSpanExporter {
        file: RotatingFile::new(trace_file),
        formatter: OtlpJsonFormatter::new(resource.clone(), super::SERVICE_NAME),
        closed: AtomicBool::new(false),
    };

    TracerProvider::builder()
        .with_config(TraceConfig::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}
