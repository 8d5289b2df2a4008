//! Paged view cache backing infinite scroll.
//!
//! [`PagedViewState`] is an append-only, page-indexed cache. Fetching is split
//! in two halves so the at-most-one-in-flight guarantee holds no matter how
//! often a scroll signal fires:
//!
//! 1. [`PagedViewState::begin_fetch`] checks the preconditions, marks the cursor
//!    as in flight and hands out the offset to fetch. While a fetch is in
//!    flight every further call is a no-op; nothing is queued.
//! 2. [`PagedViewState::complete_fetch`] applies the settled result: a page is
//!    appended and the cursor advances, a failure only clears the in-flight flag
//!    so the next scroll signal can retry.

use crate::domain::{Entry, FailureKind, FetchFailure, Page};

/// State of the paged cache.
///
/// Invariants:
/// - `pages` are never reordered or mutated after insertion
/// - `next_offset` strictly increases with every appended page
/// - at most one fetch is in flight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedViewState {
    pages: Vec<Page>,
    next_offset: usize,
    page_size: usize,
    in_flight: Option<usize>,
    has_more: bool,
    last_failure: Option<FetchFailure>,
}

impl PagedViewState {
    /// Creates an empty cache; before the first page, more data is assumed.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            pages: Vec::new(),
            next_offset: 0,
            page_size: page_size.max(1),
            in_flight: None,
            has_more: true,
            last_failure: None,
        }
    }

    /// Marks the next page as in flight and returns `(offset, limit)` to fetch.
    ///
    /// Returns `None`, without changing anything, while a fetch is already in
    /// flight or once the last page reported no continuation.
    pub fn begin_fetch(&mut self) -> Option<(usize, usize)> {
        if self.in_flight.is_some() {
            tracing::trace!(offset = self.next_offset, "page fetch already in flight");
            return None;
        }
        if !self.has_more {
            tracing::trace!("no more pages");
            return None;
        }

        self.in_flight = Some(self.next_offset);
        Some((self.next_offset, self.page_size))
    }

    /// Applies the settled result of the fetch started at `offset`.
    ///
    /// Returns `false` when the result does not belong to the in-flight fetch
    /// (a stale or duplicate response), in which case it is ignored.
    pub fn complete_fetch(&mut self, offset: usize, result: Result<Page, FetchFailure>) -> bool {
        if self.in_flight != Some(offset) {
            tracing::debug!(
                offset,
                in_flight = ?self.in_flight,
                "ignoring page result for a fetch that is not in flight"
            );
            return false;
        }
        self.in_flight = None;

        match result {
            Ok(page) => {
                self.has_more = page.has_more;
                self.next_offset += self.page_size;
                self.last_failure = None;
                tracing::debug!(
                    offset,
                    entries = page.len(),
                    has_more = self.has_more,
                    pages = self.pages.len() + 1,
                    "page appended"
                );
                self.pages.push(page);
            }
            Err(failure) => {
                tracing::debug!(offset, error = %failure, "page fetch failed");
                self.last_failure = Some(failure);
            }
        }
        true
    }

    /// Fetched pages, in fetch order.
    #[must_use]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// All cached entries, flattened in fetch order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.pages.iter().flat_map(|page| page.entries.iter())
    }

    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.pages.iter().map(Page::len).sum()
    }

    #[must_use]
    pub const fn next_offset(&self) -> usize {
        self.next_offset
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub const fn in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether the last known page indicated more data.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    /// Kind of the most recent failure, cleared by the next successful page.
    #[must_use]
    pub fn failure(&self) -> Option<FailureKind> {
        self.last_failure.as_ref().map(|failure| failure.kind)
    }
}
