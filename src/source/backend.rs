//! External collaborator abstractions.
//!
//! The engine consumes two services it does not own: a paged catalog source and
//! a name-decoration service. Both are async traits so the engine can run over
//! a REST backend in production and over in-memory doubles in tests without
//! changing any business logic.

use async_trait::async_trait;

use crate::domain::error::Result;
use crate::source::models::ListPage;

/// Paged listing of raw catalog items.
///
/// # Implementations
///
/// - [`HttpCatalogSource`](super::HttpCatalogSource): REST listing endpoint
/// - [`InMemoryCatalog`](super::InMemoryCatalog): fixed item list with failure
///   and latency injection
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Returns up to `limit` items starting at `offset`, plus the continuation.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::SourceUnavailable`](crate::CatalogError::SourceUnavailable)
    /// when the listing cannot be produced.
    async fn list(&self, offset: usize, limit: usize) -> Result<ListPage>;

    /// Returns the total size reported by the source.
    ///
    /// Issued as the ordinary listing call at `limit = 1`; backends that have
    /// a cheaper way to count can override it.
    async fn count(&self) -> Result<usize> {
        Ok(self.list(0, 1).await?.count)
    }
}

/// Lookup of the localized display name for a canonical name.
#[async_trait]
pub trait NameDecorator: Send + Sync {
    /// Returns the localized name for `canonical_name`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DecorationFailed`](crate::CatalogError::DecorationFailed)
    /// when no localized name can be produced.
    async fn decorate(&self, canonical_name: &str) -> Result<String>;
}
