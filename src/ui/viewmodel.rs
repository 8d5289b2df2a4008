//! View model types consumed by the presentation layer.
//!
//! View models are computed from `AppState` on demand and carry only
//! display-ready data and status flags. They never carry formatted error or
//! loading messages; wording belongs to the presentation layer.
//!
//! # Example
//!
//! ```rust
//! use scrolldex::ui::{CatalogViewModel, EmptyState};
//!
//! fn describe(vm: &CatalogViewModel) -> &'static str {
//!     match vm.empty_state {
//!         Some(EmptyState::StillLoading) => "loading",
//!         Some(EmptyState::NoMatches) => "no results",
//!         Some(EmptyState::LoadFailed) => "failed",
//!         None => "list",
//!     }
//! }
//! ```

use crate::catalog::{BulkStatus, ListMode};
use crate::domain::FailureKind;

/// Complete view model for one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogViewModel {
    /// Entries to render, in order.
    pub items: Vec<DisplayItem>,

    /// Whether `items` come from the paged cache or from search.
    pub mode: ListMode,

    /// Raw search input, including uncommitted composition.
    pub query: String,

    /// Fetch and prefetch status flags.
    pub status: ListStatus,

    /// Why the list is empty, when it is.
    pub empty_state: Option<EmptyState>,
}

/// Display information for one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    pub id: String,

    /// Formatted sequence number, e.g. `No.025`.
    pub number: String,

    pub display_name: String,

    pub canonical_name: String,

    /// Character ranges of `display_name` matching the search needle.
    ///
    /// Each tuple is `(start, end)` in char indices, end exclusive. Empty in
    /// browse mode.
    pub highlight_ranges: Vec<(usize, usize)>,
}

/// Status flags for the presentation boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListStatus {
    /// A page fetch is in flight.
    pub fetching_page: bool,

    /// The most recent page fetch failed; cleared by the next success.
    pub page_failure: Option<FailureKind>,

    /// The paged cache expects more data.
    pub has_more: bool,

    /// The near-end sentinel should be rendered (browse mode with more data).
    pub show_sentinel: bool,

    pub bulk: BulkStatus,

    pub bulk_fetched: usize,

    pub bulk_target: usize,

    /// A search is active while the bulk dataset is still empty.
    pub bulk_loading: bool,
}

/// Reason the visible list is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// Data that could fill the list is still being fetched.
    StillLoading,
    /// Everything that could be searched was searched, nothing matched.
    NoMatches,
    /// The fetch that would fill the list failed.
    LoadFailed,
}
