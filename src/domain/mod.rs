//! Domain layer for the catalog engine.
//!
//! This module contains the core value types and the error taxonomy, independent
//! of any transport, runtime, or presentation concern.
//!
//! # Organization
//!
//! - [`error`]: Error types, result alias, and the cloneable fetch failure summary
//! - [`entry`]: Decorated catalog entries and fetched pages
//!
//! # Examples
//!
//! ```
//! use scrolldex::domain::{Entry, Page, Result};
//!
//! fn first_page() -> Result<Page> {
//!     Ok(Page::new(vec![Entry::new("1", "bulbasaur", "이상해씨", "1")], true))
//! }
//! ```

pub mod entry;
pub mod error;

pub use entry::{Entry, Page};
pub use error::{CatalogError, FailureKind, FetchFailure, Result};
