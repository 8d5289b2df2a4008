//! Worker that executes catalog I/O off the event-handling path.
//!
//! Each posted [`WorkerMessage`] becomes a detached tokio task; results come
//! back as [`WorkerResponse`]s on the session's channel. When the session has
//! gone away the channel is closed and results are dropped, which is the only
//! liveness check a task needs: nothing is aborted at the transport level.

use tokio::sync::mpsc::UnboundedSender;
use tracing::Instrument;

use crate::catalog::{BulkPrefetcher, CatalogFetcher};
use crate::domain::error::{CatalogError, Result};
use crate::domain::FetchFailure;
use crate::worker::{WorkerMessage, WorkerResponse};

/// Executes worker messages for one session.
#[derive(Debug)]
pub struct CatalogWorker {
    fetcher: CatalogFetcher,
    responses: UnboundedSender<WorkerResponse>,
    bulk_started: bool,
}

impl CatalogWorker {
    #[must_use]
    pub fn new(fetcher: CatalogFetcher, responses: UnboundedSender<WorkerResponse>) -> Self {
        Self {
            fetcher,
            responses,
            bulk_started: false,
        }
    }

    /// Starts the task for `message` on the current tokio runtime.
    ///
    /// A second `StartBulk` for the same worker is ignored: the bulk run
    /// happens once per session.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Worker`] when called outside a tokio runtime.
    pub fn post(&mut self, message: WorkerMessage) -> Result<()> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| CatalogError::Worker(format!("no async runtime: {e}")))?;

        let (trace_id, parent_span_id) = message
            .trace_context()
            .map(|ctx| (ctx.trace_id.clone(), ctx.parent_span_id.clone()))
            .unwrap_or_default();

        match message {
            WorkerMessage::FetchPage { offset, limit, .. } => {
                let span = tracing::debug_span!(
                    "worker_fetch_page",
                    offset,
                    limit,
                    trace_id = %trace_id,
                    parent_span_id = %parent_span_id
                );
                let fetcher = self.fetcher.clone();
                let responses = self.responses.clone();

                runtime.spawn(
                    async move {
                        let response = match fetcher.fetch_page(offset, limit).await {
                            Ok(page) => WorkerResponse::PageLoaded { offset, page },
                            Err(e) => {
                                tracing::debug!(error = %e, "page fetch failed");
                                WorkerResponse::PageFailed {
                                    offset,
                                    failure: FetchFailure::from(&e),
                                }
                            }
                        };
                        deliver(&responses, response);
                    }
                    .instrument(span),
                );
            }
            WorkerMessage::StartBulk {
                batch_size,
                max_total,
                ..
            } => {
                if self.bulk_started {
                    tracing::warn!("bulk prefetch already started for this session, ignoring");
                    return Ok(());
                }
                self.bulk_started = true;

                let span = tracing::info_span!(
                    "worker_bulk",
                    trace_id = %trace_id,
                    parent_span_id = %parent_span_id
                );
                let prefetcher = BulkPrefetcher::new(self.fetcher.clone(), batch_size, max_total);
                let responses = self.responses.clone();

                runtime.spawn(
                    async move {
                        let report = prefetcher
                            .run(|progress| deliver(&responses, progress.into()))
                            .await;
                        tracing::debug!(
                            fetched = report.fetched,
                            target = report.target,
                            complete = report.complete,
                            "bulk task finished"
                        );
                    }
                    .instrument(span),
                );
            }
        }
        Ok(())
    }

    /// Whether a bulk run has been started by this worker.
    #[must_use]
    pub const fn bulk_started(&self) -> bool {
        self.bulk_started
    }
}

fn deliver(responses: &UnboundedSender<WorkerResponse>, response: WorkerResponse) {
    if responses.send(response).is_err() {
        tracing::debug!("session ended, dropping worker response");
    }
}
