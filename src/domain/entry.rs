//! Catalog entry and page domain models.
//!
//! An [`Entry`] is one catalog item after decoration with its localized display
//! name. A [`Page`] is the ordered result of a single fetch at a given offset.
//! Both are immutable once constructed.

use serde::{Deserialize, Serialize};

/// Width used when zero-padding sequence numbers for display.
const SEQUENCE_DISPLAY_WIDTH: usize = 3;

/// One catalog item enriched with a localized display name.
///
/// # Fields
///
/// - `id`: Stable unique identifier taken from the source (e.g. a catalog number)
/// - `canonical_name`: Name as reported by the paged catalog source
/// - `display_name`: Localized name from the name-decoration service
/// - `sequence_number`: Numeric string used for display and for search ordering
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub canonical_name: String,
    pub display_name: String,
    pub sequence_number: String,
}

impl Entry {
    /// Creates a new entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use scrolldex::Entry;
    ///
    /// let entry = Entry::new("25", "pikachu", "피카츄", "25");
    /// assert_eq!(entry.numeric_sequence(), Some(25));
    /// ```
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        canonical_name: impl Into<String>,
        display_name: impl Into<String>,
        sequence_number: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            canonical_name: canonical_name.into(),
            display_name: display_name.into(),
            sequence_number: sequence_number.into(),
        }
    }

    /// Returns the numeric value of `sequence_number`, if it parses.
    #[must_use]
    pub fn numeric_sequence(&self) -> Option<u64> {
        self.sequence_number.trim().parse().ok()
    }

    /// Key used to order search results.
    ///
    /// Entries whose sequence number does not parse sort after every numbered
    /// entry.
    #[must_use]
    pub fn sequence_sort_key(&self) -> u64 {
        self.numeric_sequence().unwrap_or(u64::MAX)
    }

    /// Formats the sequence number for display, e.g. `No.025`.
    ///
    /// Non-numeric sequence numbers are shown verbatim after the prefix.
    #[must_use]
    pub fn display_number(&self) -> String {
        self.numeric_sequence().map_or_else(
            || format!("No.{}", self.sequence_number),
            |n| format!("No.{n:0width$}", width = SEQUENCE_DISPLAY_WIDTH),
        )
    }
}

/// One batch of entries fetched at a given offset.
///
/// `has_more` mirrors the source's continuation indicator: `true` when the
/// listing reported a next page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub entries: Vec<Entry>,
    pub has_more: bool,
}

impl Page {
    #[must_use]
    pub fn new(entries: Vec<Entry>, has_more: bool) -> Self {
        Self { entries, has_more }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_number_pads_to_three_digits() {
        assert_eq!(Entry::new("7", "squirtle", "꼬부기", "7").display_number(), "No.007");
        assert_eq!(Entry::new("1010", "x", "x", "1010").display_number(), "No.1010");
        assert_eq!(Entry::new("?", "x", "x", "abc").display_number(), "No.abc");
    }

    #[test]
    fn unparsable_sequence_sorts_last() {
        let numbered = Entry::new("1", "a", "a", "1");
        let broken = Entry::new("b", "b", "b", "n/a");
        assert!(numbered.sequence_sort_key() < broken.sequence_sort_key());
        assert_eq!(Entry::new("3", "c", "c", " 3 ").numeric_sequence(), Some(3));
    }
}
