//! Error types for the catalog engine.
//!
//! This module defines the centralized error type [`CatalogError`], the
//! [`Result`] alias used throughout the crate, and [`FetchFailure`], the
//! cloneable summary of a failed fetch that travels across the worker channel.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The main error type for catalog engine operations.
///
/// Fetch failures (`SourceUnavailable`, `DecorationFailed`) abort only the page or
/// batch that produced them. `BulkIncomplete` describes a degraded state rather
/// than a hard failure: search keeps working over whatever was accumulated.
///
/// # Examples
///
/// ```
/// use scrolldex::CatalogError;
///
/// let err = CatalogError::DecorationFailed {
///     name: "pikachu".to_string(),
///     reason: "no localized name".to_string(),
/// };
/// assert_eq!(err.to_string(), "Decoration failed for pikachu: no localized name");
/// ```
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The paged catalog source could not produce a listing.
    ///
    /// Covers transport failures, non-success responses, and malformed listing
    /// data (for example an item URL without a trailing id).
    #[error("Catalog source unavailable: {0}")]
    SourceUnavailable(String),

    /// The name-decoration service failed for one entry of a page.
    ///
    /// A single failure fails the whole page; partially decorated pages are
    /// never returned.
    #[error("Decoration failed for {name}: {reason}")]
    DecorationFailed {
        /// Canonical name whose decoration failed.
        name: String,
        /// Description of the underlying failure.
        reason: String,
    },

    /// The background bulk run stopped before reaching its target.
    #[error("Bulk prefetch incomplete: {fetched} of {target} entries fetched")]
    BulkIncomplete {
        /// Entries accumulated before the run stopped.
        fetched: usize,
        /// Target the run was trying to reach.
        target: usize,
    },

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Communication with the background worker failed, or it reported data
    /// that violates an accumulator invariant.
    #[error("Worker communication error: {0}")]
    Worker(String),
}

/// A specialized `Result` type for catalog engine operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Which kind of fetch failure occurred.
///
/// This is the status flag exposed to the presentation boundary; it never
/// carries a formatted message of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    SourceUnavailable,
    DecorationFailed,
    Other,
}

/// Cloneable summary of a failed fetch.
///
/// [`CatalogError`] wraps `std::io::Error` and is therefore neither `Clone` nor
/// `PartialEq`; worker responses carry this instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&CatalogError> for FetchFailure {
    fn from(error: &CatalogError) -> Self {
        let kind = match error {
            CatalogError::SourceUnavailable(_) => FailureKind::SourceUnavailable,
            CatalogError::DecorationFailed { .. } => FailureKind::DecorationFailed,
            _ => FailureKind::Other,
        };
        Self {
            kind,
            message: error.to_string(),
        }
    }
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}
