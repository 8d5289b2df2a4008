//! Search input pipeline and visible-list derivation.
//!
//! Input is two-stage: raw keystrokes (including intermediate composition
//! events) only update [`SearchState::raw_text`]; the filter observes
//! [`SearchState::committed_text`], which moves only on an explicit commit.
//!
//! [`visible_list`] is the pure projection from the committed text and the two
//! accumulators to the list the presentation layer renders:
//!
//! - committed text trims to empty: the paged cache, flattened in fetch order
//! - otherwise: bulk entries whose lowercased display name contains the
//!   lowercased, trimmed needle, stably sorted by numeric sequence number

use crate::catalog::bulk::BulkAccumulator;
use crate::catalog::paged::PagedViewState;
use crate::domain::Entry;

/// Raw and committed search text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    raw_text: String,
    committed_text: String,
}

impl SearchState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a keystroke or composition update without touching the filter.
    pub fn set_raw(&mut self, text: &str) {
        text.clone_into(&mut self.raw_text);
    }

    /// Promotes `text` to the committed value.
    ///
    /// Returns `true` when this commit starts a new search, i.e. the committed
    /// text goes from trim-empty to non-empty. Continuing to type within an
    /// active search returns `false`.
    pub fn commit(&mut self, text: &str) -> bool {
        let was_active = self.is_active();
        text.clone_into(&mut self.raw_text);
        text.clone_into(&mut self.committed_text);
        let started = !was_active && self.is_active();

        tracing::trace!(committed = %self.committed_text, started, "search text committed");
        started
    }

    #[must_use]
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    #[must_use]
    pub fn committed_text(&self) -> &str {
        &self.committed_text
    }

    /// Whether a search is active (committed text is not blank).
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.committed_text.trim().is_empty()
    }

    /// Lowercased, trimmed needle, or `None` when no search is active.
    #[must_use]
    pub fn needle(&self) -> Option<String> {
        normalize_needle(&self.committed_text)
    }
}

/// Which source the visible list was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    /// Paged cache, in fetch order.
    Browse,
    /// Filtered and sorted bulk dataset.
    Search,
}

/// The derived list plus the side-channel facts the presentation needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleList<'a> {
    pub entries: Vec<&'a Entry>,
    pub mode: ListMode,
    /// Number of entries in the bulk dataset when the list was derived.
    pub bulk_entry_count: usize,
}

impl VisibleList<'_> {
    /// Search is active but the bulk dataset has nothing yet.
    #[must_use]
    pub fn is_awaiting_bulk(&self) -> bool {
        self.mode == ListMode::Search && self.bulk_entry_count == 0
    }

    /// Ids of the visible entries, in order.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.id.as_str()).collect()
    }
}

/// Derives the visible list. Pure; recomputed on every read.
#[must_use]
pub fn visible_list<'a>(
    committed_text: &str,
    paged: &'a PagedViewState,
    bulk: &'a BulkAccumulator,
) -> VisibleList<'a> {
    let bulk_entry_count = bulk.len();

    let Some(needle) = normalize_needle(committed_text) else {
        return VisibleList {
            entries: paged.entries().collect(),
            mode: ListMode::Browse,
            bulk_entry_count,
        };
    };

    let mut entries: Vec<&Entry> = bulk
        .entries()
        .iter()
        .filter(|entry| matches_display_name(entry, &needle))
        .collect();
    entries.sort_by_key(|entry| entry.sequence_sort_key());

    tracing::trace!(needle = %needle, matched = entries.len(), bulk_entry_count, "search list derived");

    VisibleList {
        entries,
        mode: ListMode::Search,
        bulk_entry_count,
    }
}

/// Substring match of an already-normalized needle against the display name.
///
/// Only the localized display name is matched; canonical names and ids are not.
#[must_use]
pub fn matches_display_name(entry: &Entry, needle: &str) -> bool {
    entry.display_name.to_lowercase().contains(needle)
}

/// Character ranges `(start, end)` of every non-overlapping, case-insensitive
/// occurrence of `needle` in `text`.
#[must_use]
pub fn match_ranges(text: &str, needle: &str) -> Vec<(usize, usize)> {
    let needle: Vec<char> = needle.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return vec![];
    }

    // compare char by char so indices stay in the original text's char space
    let haystack: Vec<char> = text.chars().collect();
    let lowered: Vec<Option<char>> = haystack
        .iter()
        .map(|c| {
            let mut lower = c.to_lowercase();
            match (lower.next(), lower.next()) {
                (Some(single), None) => Some(single),
                _ => None,
            }
        })
        .collect();

    let mut ranges = Vec::new();
    let mut start = 0;
    while start + needle.len() <= lowered.len() {
        let hit = lowered[start..start + needle.len()]
            .iter()
            .zip(&needle)
            .all(|(c, n)| *c == Some(*n));
        if hit {
            ranges.push((start, start + needle.len()));
            start += needle.len();
        } else {
            start += 1;
        }
    }
    ranges
}

fn normalize_needle(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}
