//! Background bulk prefetch of the full catalog.
//!
//! The [`BulkPrefetcher`] sizes the catalog once, clamps the size to a
//! configured cap, and walks it from offset 0 in fixed-size batches, strictly
//! one after another. Every settled step is reported as a [`BulkProgress`];
//! the [`BulkAccumulator`] folds those reports into the dataset used by search.
//!
//! A failed batch is never retried: the run stops, the accumulator is marked
//! aborted, and search keeps working over the partial dataset.

use serde::{Deserialize, Serialize};
use tracing::Instrument;

use crate::catalog::fetcher::CatalogFetcher;
use crate::domain::error::{CatalogError, Result};
use crate::domain::{Entry, FetchFailure};

/// Lifecycle of the bulk run for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BulkStatus {
    /// No run has been requested yet.
    #[default]
    NotStarted,
    /// The run is accumulating batches.
    Running,
    /// The target was reached or the source ran out of entries.
    Complete,
    /// A batch failed; the accumulated entries stay but will never complete.
    Aborted,
}

/// One settled step of a bulk run, in the order the run produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkProgress {
    /// The catalog was sized; `target` is the clamped total.
    Sized { target: usize, reported: usize },
    /// A decorated batch fetched at `offset`.
    Batch { offset: usize, entries: Vec<Entry> },
    /// The run reached its target or the source signalled exhaustion.
    Finished { fetched: usize },
    /// The run stopped on a failure after `fetched` entries.
    Aborted { fetched: usize, failure: FetchFailure },
}

/// Summary returned once a run ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkReport {
    pub fetched: usize,
    pub target: usize,
    pub complete: bool,
}

/// Append-only accumulator of the bulk dataset.
///
/// Entries are appended in fetch order only; `status` becomes
/// [`BulkStatus::Complete`] at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkAccumulator {
    entries: Vec<Entry>,
    total_target: usize,
    sized: bool,
    status: BulkStatus,
    failure: Option<FetchFailure>,
}

impl BulkAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves from `NotStarted` to `Running`.
    ///
    /// Returns `false` if a run was already started for this session, so the
    /// caller never requests a second one.
    pub fn mark_started(&mut self) -> bool {
        if self.status != BulkStatus::NotStarted {
            return false;
        }
        self.status = BulkStatus::Running;
        true
    }

    /// Records the clamped target size.
    pub fn set_target(&mut self, target: usize) {
        self.total_target = target;
        self.sized = true;
        if target == 0 {
            self.complete();
        }
    }

    /// Appends a batch fetched at `offset`.
    ///
    /// Batches arrive strictly sequentially, so `offset` must equal the number
    /// of entries already accumulated. Batches arriving after the run settled
    /// are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Worker`] if `offset` does not continue the
    /// accumulated entries; nothing is appended in that case.
    pub fn append(&mut self, offset: usize, entries: Vec<Entry>) -> Result<()> {
        if self.status != BulkStatus::Running {
            tracing::debug!(offset, status = ?self.status, "dropping bulk batch for settled run");
            return Ok(());
        }
        if offset != self.entries.len() {
            return Err(CatalogError::Worker(format!(
                "bulk batch at offset {offset} does not continue {} accumulated entries",
                self.entries.len()
            )));
        }

        self.entries.extend(entries);
        tracing::debug!(
            fetched = self.entries.len(),
            target = self.total_target,
            "bulk batch appended"
        );

        if self.sized && self.entries.len() >= self.total_target {
            self.complete();
        }
        Ok(())
    }

    /// Marks the run complete (source exhausted or target reached).
    pub fn finish(&mut self) {
        if self.status == BulkStatus::Running {
            self.complete();
        }
    }

    /// Marks the run aborted; accumulated entries are kept.
    pub fn abort(&mut self, failure: FetchFailure) {
        if self.status != BulkStatus::Running {
            return;
        }
        tracing::warn!(
            fetched = self.entries.len(),
            target = self.total_target,
            error = %failure,
            "bulk prefetch aborted, search continues over partial data"
        );
        self.status = BulkStatus::Aborted;
        self.failure = Some(failure);
    }

    fn complete(&mut self) {
        if self.status == BulkStatus::Complete {
            return;
        }
        self.status = BulkStatus::Complete;
        tracing::info!(fetched = self.entries.len(), target = self.total_target, "bulk prefetch complete");
    }

    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn total_target(&self) -> usize {
        self.total_target
    }

    #[must_use]
    pub const fn status(&self) -> BulkStatus {
        self.status
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == BulkStatus::Complete
    }

    #[must_use]
    pub fn failure(&self) -> Option<&FetchFailure> {
        self.failure.as_ref()
    }

    /// Reports the degraded state of an aborted run as an error.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::BulkIncomplete`] once the run has aborted.
    pub fn outcome(&self) -> Result<()> {
        if self.status == BulkStatus::Aborted {
            return Err(CatalogError::BulkIncomplete {
                fetched: self.entries.len(),
                target: self.total_target,
            });
        }
        Ok(())
    }
}

/// Drives one sequential bulk run.
#[derive(Debug, Clone)]
pub struct BulkPrefetcher {
    fetcher: CatalogFetcher,
    batch_size: usize,
    max_total: usize,
}

impl BulkPrefetcher {
    #[must_use]
    pub fn new(fetcher: CatalogFetcher, batch_size: usize, max_total: usize) -> Self {
        Self {
            fetcher,
            batch_size: batch_size.max(1),
            max_total,
        }
    }

    /// Runs the prefetch to completion, reporting every step to `emit`.
    ///
    /// Batch N+1 is requested only after batch N has been emitted. The run
    /// stops at the first failure without retrying.
    pub async fn run<F>(&self, emit: F) -> BulkReport
    where
        F: FnMut(BulkProgress) + Send,
    {
        let span = tracing::info_span!("bulk_prefetch", batch_size = self.batch_size, max_total = self.max_total);
        self.run_batches(emit).instrument(span).await
    }

    async fn run_batches<F>(&self, mut emit: F) -> BulkReport
    where
        F: FnMut(BulkProgress) + Send,
    {
        let reported = match self.fetcher.count().await {
            Ok(reported) => reported,
            Err(e) => return Self::abort(&mut emit, 0, 0, &e),
        };

        let target = reported.min(self.max_total);
        tracing::debug!(reported, target, "catalog sized");
        emit(BulkProgress::Sized { target, reported });

        let mut fetched = 0;
        while fetched < target {
            let limit = self.batch_size.min(target - fetched);
            match self.fetcher.fetch_page(fetched, limit).await {
                Ok(page) if page.is_empty() && page.has_more => {
                    tracing::warn!(fetched, target, "source returned an empty batch but reported more");
                    let e = CatalogError::SourceUnavailable(format!(
                        "empty batch at offset {fetched} with more entries reported"
                    ));
                    return Self::abort(&mut emit, fetched, target, &e);
                }
                Ok(page) => {
                    let received = page.len();
                    let has_more = page.has_more;
                    emit(BulkProgress::Batch {
                        offset: fetched,
                        entries: page.entries,
                    });
                    fetched += received;

                    if !has_more || received == 0 {
                        if fetched < target {
                            tracing::debug!(fetched, target, "source exhausted before target");
                        }
                        break;
                    }
                }
                Err(e) => return Self::abort(&mut emit, fetched, target, &e),
            }
        }

        emit(BulkProgress::Finished { fetched });
        BulkReport {
            fetched,
            target,
            complete: true,
        }
    }

    fn abort<F>(emit: &mut F, fetched: usize, target: usize, error: &CatalogError) -> BulkReport
    where
        F: FnMut(BulkProgress),
    {
        emit(BulkProgress::Aborted {
            fetched,
            failure: FetchFailure::from(error),
        });
        BulkReport {
            fetched,
            target,
            complete: false,
        }
    }
}
