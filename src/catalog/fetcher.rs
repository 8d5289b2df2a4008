//! Catalog page fetcher.
//!
//! Wraps the paged catalog source and the name-decoration service into one
//! "fetch page at offset" operation that yields fully decorated entries.

use std::sync::Arc;

use futures_util::future::try_join_all;
use tracing::Instrument;

use crate::domain::error::{CatalogError, Result};
use crate::domain::{Entry, Page};
use crate::infrastructure::resource_id;
use crate::source::models::ListItem;
use crate::source::{CatalogSource, NameDecorator};

/// Fetches and decorates catalog pages.
///
/// Cheap to clone; both collaborators are shared.
#[derive(Clone)]
pub struct CatalogFetcher {
    source: Arc<dyn CatalogSource>,
    decorator: Arc<dyn NameDecorator>,
}

impl CatalogFetcher {
    #[must_use]
    pub fn new(source: Arc<dyn CatalogSource>, decorator: Arc<dyn NameDecorator>) -> Self {
        Self { source, decorator }
    }

    /// Total size reported by the catalog source.
    ///
    /// # Errors
    ///
    /// Propagates the source's [`CatalogError::SourceUnavailable`].
    pub async fn count(&self) -> Result<usize> {
        self.source.count().await
    }

    /// Fetches `limit` entries at `offset` and decorates every one of them.
    ///
    /// Decoration calls for the page run concurrently and the entries keep the
    /// source's order. A page is returned only once every entry is decorated.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::SourceUnavailable`] if the listing fails or an item URL
    ///   carries no id
    /// - [`CatalogError::DecorationFailed`] if any single decoration fails
    pub async fn fetch_page(&self, offset: usize, limit: usize) -> Result<Page> {
        let span = tracing::debug_span!("fetch_page", offset, limit);
        self.fetch_decorated(offset, limit).instrument(span).await
    }

    async fn fetch_decorated(&self, offset: usize, limit: usize) -> Result<Page> {
        let listing = self.source.list(offset, limit).await?;
        let has_more = listing.has_more();

        let entries = try_join_all(listing.items.into_iter().map(|item| self.decorate(item))).await?;

        tracing::debug!(entries = entries.len(), has_more, "page decorated");
        Ok(Page::new(entries, has_more))
    }

    async fn decorate(&self, item: ListItem) -> Result<Entry> {
        let id = resource_id(&item.url).ok_or_else(|| {
            CatalogError::SourceUnavailable(format!("item {} has no id in {}", item.name, item.url))
        })?;
        let display_name = self.decorator.decorate(&item.name).await?;

        Ok(Entry {
            sequence_number: id.clone(),
            id,
            canonical_name: item.name,
            display_name,
        })
    }
}

impl std::fmt::Debug for CatalogFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogFetcher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{InMemoryCatalog, ListItem, StaticNames};

    fn names() -> StaticNames {
        StaticNames::new([
            ("bulbasaur", "이상해씨"),
            ("ivysaur", "이상해풀"),
            ("venusaur", "이상해꽃"),
        ])
    }

    #[tokio::test]
    async fn decorates_every_entry_in_order() {
        let catalog = InMemoryCatalog::from_names(&["bulbasaur", "ivysaur", "venusaur"]);
        let fetcher = CatalogFetcher::new(Arc::new(catalog), Arc::new(names()));

        let page = fetcher.fetch_page(0, 2).await.unwrap();
        assert!(page.has_more);
        assert_eq!(
            page.entries,
            vec![
                Entry::new("1", "bulbasaur", "이상해씨", "1"),
                Entry::new("2", "ivysaur", "이상해풀", "2"),
            ]
        );

        let last = fetcher.fetch_page(2, 2).await.unwrap();
        assert!(!last.has_more);
        assert_eq!(last.entries[0].display_name, "이상해꽃");
    }

    #[tokio::test]
    async fn listing_failure_is_source_unavailable() {
        let catalog = InMemoryCatalog::from_names(&["bulbasaur"]);
        catalog.set_failing(0, true);
        let fetcher = CatalogFetcher::new(Arc::new(catalog), Arc::new(names()));

        assert!(matches!(
            fetcher.fetch_page(0, 1).await,
            Err(CatalogError::SourceUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn one_failed_decoration_fails_the_page() {
        let catalog = InMemoryCatalog::from_names(&["bulbasaur", "ivysaur", "venusaur"]);
        let decorator = names();
        decorator.set_failing("ivysaur", true);
        let fetcher = CatalogFetcher::new(Arc::new(catalog), Arc::new(decorator));

        match fetcher.fetch_page(0, 3).await {
            Err(CatalogError::DecorationFailed { name, .. }) => assert_eq!(name, "ivysaur"),
            other => panic!("expected decoration failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn item_without_id_is_rejected() {
        let catalog = InMemoryCatalog::new(vec![ListItem::new("bulbasaur", "https://h/")]);
        let fetcher = CatalogFetcher::new(Arc::new(catalog), Arc::new(names()));

        assert!(matches!(
            fetcher.fetch_page(0, 1).await,
            Err(CatalogError::SourceUnavailable(_))
        ));
    }
}
