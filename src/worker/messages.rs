//! Worker message types.
//!
//! This module defines the request/response protocol between the event handler
//! and the background worker that performs catalog I/O. Requests carry the
//! trace context of the dispatching span so worker spans can be linked back to
//! the event that caused them.

use serde::{Deserialize, Serialize};

use crate::catalog::BulkProgress;
use crate::domain::{Entry, FetchFailure, Page};

/// Distributed tracing context captured at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Span ID of the dispatching span.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the OpenTelemetry ids of the current `tracing` span.
    ///
    /// Returns `None` when no OpenTelemetry layer is installed or the span
    /// context is otherwise invalid.
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }
}

/// Generates constructors that attach the current trace context.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    fetch_page(FetchPage { offset: usize, limit: usize }),
    start_bulk(StartBulk { batch_size: usize, max_total: usize }),
}

/// Requests posted to the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Fetch and decorate one infinite-scroll page.
    FetchPage {
        offset: usize,
        limit: usize,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Start the one-shot background bulk run.
    StartBulk {
        /// Entries per batch.
        batch_size: usize,
        /// Cap on the catalog size the run will try to reach.
        max_total: usize,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::FetchPage { trace_context, .. } | Self::StartBulk { trace_context, .. } => {
                trace_context.as_ref()
            }
        }
    }
}

/// Responses reported by the worker, in the order each producer settled them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// The page requested at `offset` was fetched and decorated.
    PageLoaded { offset: usize, page: Page },

    /// The page requested at `offset` failed.
    PageFailed { offset: usize, failure: FetchFailure },

    /// The bulk run sized the catalog.
    BulkSized { target: usize, reported: usize },

    /// The bulk run fetched one batch.
    BulkBatch { offset: usize, entries: Vec<Entry> },

    /// The bulk run reached its target or exhausted the source.
    BulkFinished { fetched: usize },

    /// The bulk run stopped on a failure.
    BulkAborted { fetched: usize, failure: FetchFailure },
}

impl WorkerResponse {
    /// Variant name, for span and log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::PageLoaded { .. } => "page_loaded",
            Self::PageFailed { .. } => "page_failed",
            Self::BulkSized { .. } => "bulk_sized",
            Self::BulkBatch { .. } => "bulk_batch",
            Self::BulkFinished { .. } => "bulk_finished",
            Self::BulkAborted { .. } => "bulk_aborted",
        }
    }
}

impl From<BulkProgress> for WorkerResponse {
    fn from(progress: BulkProgress) -> Self {
        match progress {
            BulkProgress::Sized { target, reported } => Self::BulkSized { target, reported },
            BulkProgress::Batch { offset, entries } => Self::BulkBatch { offset, entries },
            BulkProgress::Finished { fetched } => Self::BulkFinished { fetched },
            BulkProgress::Aborted { fetched, failure } => Self::BulkAborted { fetched, failure },
        }
    }
}
