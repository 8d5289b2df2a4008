//! Data acquisition and search synchronization.
//!
//! Two independent producers fill two single-writer containers, and one pure
//! function projects them into the visible list:
//!
//! ```text
//!   scroll signal ─► PagedViewState ─┐
//!                                    ├─► visible_list(committed_text) ─► view
//!   session start ─► BulkAccumulator ┘
//! ```
//!
//! # Modules
//!
//! - [`fetcher`]: "fetch page N" over the catalog source plus decoration
//! - [`paged`]: Append-only page cache with an at-most-one-in-flight cursor
//! - [`bulk`]: Sequential background prefetch and its accumulator
//! - [`search`]: Raw/committed search text and the visible-list projection

pub mod bulk;
pub mod fetcher;
pub mod paged;
pub mod search;

pub use bulk::{BulkAccumulator, BulkPrefetcher, BulkProgress, BulkReport, BulkStatus};
pub use fetcher::CatalogFetcher;
pub use paged::PagedViewState;
pub use search::{visible_list, ListMode, SearchState, VisibleList};
