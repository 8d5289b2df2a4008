//! Session state and view model computation.
//!
//! [`AppState`] owns every mutable piece of a catalog session: the paged
//! cache, the bulk accumulator, the search text and the scroll-trigger phase.
//! It is mutated only by [`handle_event`](super::handle_event), one event at a
//! time, so each container has exactly one writer.
//!
//! The visible list and the view model are derived on demand and never
//! stored.
//!
//! # Example
//!
//! ```rust
//! use scrolldex::app::AppState;
//! use scrolldex::Config;
//!
//! let state = AppState::new(&Config::default());
//! let vm = state.compute_viewmodel();
//! assert!(vm.items.is_empty());
//! ```

use super::modes::ScrollPhase;
use crate::catalog::search::match_ranges;
use crate::catalog::{
    visible_list, BulkAccumulator, BulkStatus, ListMode, PagedViewState, SearchState, VisibleList,
};
use crate::config::Config;
use crate::domain::Entry;
use crate::ui::viewmodel::{CatalogViewModel, DisplayItem, EmptyState, ListStatus};

/// Fetch sizing captured from the configuration at session start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchSettings {
    pub page_size: usize,
    pub bulk_batch_size: usize,
    pub bulk_max_total: usize,
}

impl From<&Config> for FetchSettings {
    fn from(config: &Config) -> Self {
        Self {
            page_size: config.page_size.max(1),
            bulk_batch_size: config.bulk_batch_size.max(1),
            bulk_max_total: config.bulk_max_total,
        }
    }
}

/// Central state container for one catalog session.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Pages loaded for browsing, in fetch order.
    pub(crate) paged: PagedViewState,

    /// Background prefetch of the capped catalog, used for search.
    pub(crate) bulk: BulkAccumulator,

    /// Raw and committed search text.
    pub(crate) search: SearchState,

    /// Scroll-trigger controller phase.
    pub(crate) scroll: ScrollPhase,

    pub(crate) settings: FetchSettings,
}

impl AppState {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self::with_settings(FetchSettings::from(config))
    }

    #[must_use]
    pub fn with_settings(settings: FetchSettings) -> Self {
        Self {
            paged: PagedViewState::new(settings.page_size),
            bulk: BulkAccumulator::new(),
            search: SearchState::new(),
            scroll: ScrollPhase::Idle,
            settings,
        }
    }

    #[must_use]
    pub const fn paged(&self) -> &PagedViewState {
        &self.paged
    }

    #[must_use]
    pub const fn bulk(&self) -> &BulkAccumulator {
        &self.bulk
    }

    #[must_use]
    pub const fn search(&self) -> &SearchState {
        &self.search
    }

    #[must_use]
    pub const fn scroll(&self) -> ScrollPhase {
        self.scroll
    }

    #[must_use]
    pub const fn settings(&self) -> FetchSettings {
        self.settings
    }

    /// Whether the committed search text is non-blank.
    #[must_use]
    pub fn search_active(&self) -> bool {
        self.search.is_active()
    }

    /// Derives the list to render from the committed search text.
    #[must_use]
    pub fn visible_list(&self) -> VisibleList<'_> {
        visible_list(self.search.committed_text(), &self.paged, &self.bulk)
    }

    /// Computes a renderable snapshot of the session.
    ///
    /// In search mode each item carries the character ranges of its display
    /// name that matched the needle. Status flags are raw facts; no loading or
    /// error text is produced here.
    #[must_use]
    pub fn compute_viewmodel(&self) -> CatalogViewModel {
        let list = self.visible_list();
        let needle = match list.mode {
            ListMode::Search => self.search.needle(),
            ListMode::Browse => None,
        };

        let items: Vec<DisplayItem> = list
            .entries
            .iter()
            .map(|entry| Self::compute_display_item(entry, needle.as_deref()))
            .collect();

        let status = self.compute_status(&list);
        let empty_state = if items.is_empty() {
            Some(self.compute_empty_state(&list, &status))
        } else {
            None
        };

        CatalogViewModel {
            items,
            mode: list.mode,
            query: self.search.raw_text().to_string(),
            status,
            empty_state,
        }
    }

    fn compute_display_item(entry: &Entry, needle: Option<&str>) -> DisplayItem {
        let highlight_ranges = needle
            .map(|needle| match_ranges(&entry.display_name, needle))
            .unwrap_or_default();

        DisplayItem {
            id: entry.id.clone(),
            number: entry.display_number(),
            display_name: entry.display_name.clone(),
            canonical_name: entry.canonical_name.clone(),
            highlight_ranges,
        }
    }

    fn compute_status(&self, list: &VisibleList<'_>) -> ListStatus {
        ListStatus {
            fetching_page: self.paged.in_flight(),
            page_failure: self.paged.failure(),
            has_more: self.paged.has_more(),
            show_sentinel: list.mode == ListMode::Browse && self.paged.has_more(),
            bulk: self.bulk.status(),
            bulk_fetched: self.bulk.len(),
            bulk_target: self.bulk.total_target(),
            // a finished run with no entries is not loading
            bulk_loading: list.is_awaiting_bulk()
                && matches!(self.bulk.status(), BulkStatus::NotStarted | BulkStatus::Running),
        }
    }

    fn compute_empty_state(&self, list: &VisibleList<'_>, status: &ListStatus) -> EmptyState {
        match list.mode {
            ListMode::Search => {
                if status.bulk_loading {
                    EmptyState::StillLoading
                } else if list.bulk_entry_count == 0 && self.bulk.failure().is_some() {
                    EmptyState::LoadFailed
                } else {
                    EmptyState::NoMatches
                }
            }
            ListMode::Browse => {
                if status.page_failure.is_some() && !status.fetching_page {
                    EmptyState::LoadFailed
                } else if status.fetching_page || status.has_more {
                    EmptyState::StillLoading
                } else {
                    EmptyState::NoMatches
                }
            }
        }
    }
}
