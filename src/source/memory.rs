//! In-process catalog source and name decorator.
//!
//! [`InMemoryCatalog`] serves a fixed list of items with the same listing shape
//! as the REST source, records every call, and can inject per-offset failures
//! and latency. [`StaticNames`] decorates from a lookup table. Both are used by
//! the test suite and are handy for demos that should not touch the network.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::error::{CatalogError, Result};
use crate::source::backend::{CatalogSource, NameDecorator};
use crate::source::models::{ListItem, ListPage};

/// Base URL used for generated item URLs.
pub const MEMORY_BASE_URL: &str = "https://catalog.invalid/api/v2/pokemon-species";

type LatencyFn = Box<dyn Fn(usize, usize) -> Duration + Send + Sync>;

/// One recorded `list` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListCall {
    pub offset: usize,
    pub limit: usize,
}

/// Fixed, in-memory paged catalog source.
///
/// # Example
///
/// ```
/// use scrolldex::source::{CatalogSource, InMemoryCatalog};
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let catalog = InMemoryCatalog::from_names(&["bulbasaur", "ivysaur", "venusaur"]);
/// let page = catalog.list(0, 2).await?;
/// assert_eq!(page.items.len(), 2);
/// assert!(page.has_more());
/// assert_eq!(catalog.count().await?, 3);
/// # Ok::<(), scrolldex::CatalogError>(())
/// # }).unwrap();
/// ```
pub struct InMemoryCatalog {
    items: Vec<ListItem>,
    failing_offsets: Mutex<HashSet<usize>>,
    latency: Option<LatencyFn>,
    calls: Mutex<Vec<ListCall>>,
}

impl InMemoryCatalog {
    /// Creates a catalog from raw items.
    #[must_use]
    pub fn new(items: Vec<ListItem>) -> Self {
        Self {
            items,
            failing_offsets: Mutex::new(HashSet::new()),
            latency: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Creates a catalog whose item at position `i` has id `i + 1`.
    #[must_use]
    pub fn from_names(names: &[&str]) -> Self {
        let items = names
            .iter()
            .enumerate()
            .map(|(index, name)| ListItem::new(*name, format!("{MEMORY_BASE_URL}/{}/", index + 1)))
            .collect();
        Self::new(items)
    }

    /// Delays every `list(offset, limit)` call by `latency(offset, limit)`.
    #[must_use]
    pub fn with_latency<F>(mut self, latency: F) -> Self
    where
        F: Fn(usize, usize) -> Duration + Send + Sync + 'static,
    {
        self.latency = Some(Box::new(latency));
        self
    }

    /// Makes listings starting at `offset` fail (or succeed again).
    pub fn set_failing(&self, offset: usize, failing: bool) {
        let mut offsets = self.failing_offsets.lock().unwrap_or_else(PoisonError::into_inner);
        if failing {
            offsets.insert(offset);
        } else {
            offsets.remove(&offset);
        }
    }

    /// Returns every `list` call made so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<ListCall> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of items served by this catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn is_failing(&self, offset: usize) -> bool {
        self.failing_offsets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&offset)
    }
}

#[async_trait]
impl CatalogSource for InMemoryCatalog {
    async fn list(&self, offset: usize, limit: usize) -> Result<ListPage> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ListCall { offset, limit });

        if let Some(latency) = &self.latency {
            tokio::time::sleep(latency(offset, limit)).await;
        }

        if self.is_failing(offset) {
            tracing::debug!(offset, limit, "injected listing failure");
            return Err(CatalogError::SourceUnavailable(format!(
                "listing at offset {offset} failed"
            )));
        }

        let start = offset.min(self.items.len());
        let end = offset.saturating_add(limit).min(self.items.len());
        let next = (end < self.items.len())
            .then(|| format!("{MEMORY_BASE_URL}?offset={end}&limit={limit}"));

        Ok(ListPage {
            count: self.items.len(),
            next,
            items: self.items[start..end].to_vec(),
        })
    }
}

impl std::fmt::Debug for InMemoryCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCatalog")
            .field("items", &self.items.len())
            .finish_non_exhaustive()
    }
}

/// Table-driven name decorator.
///
/// Names missing from the table fail decoration unless the decorator was built
/// with [`StaticNames::echo`], in which case the canonical name is returned.
#[derive(Debug, Default)]
pub struct StaticNames {
    names: HashMap<String, String>,
    echo_missing: bool,
    failing: Mutex<HashSet<String>>,
    calls: AtomicUsize,
}

impl StaticNames {
    /// Creates a decorator from `(canonical, localized)` pairs.
    #[must_use]
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            names: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            ..Self::default()
        }
    }

    /// Creates a decorator that returns each canonical name unchanged.
    #[must_use]
    pub fn echo() -> Self {
        Self {
            echo_missing: true,
            ..Self::default()
        }
    }

    /// Makes decoration of `canonical_name` fail (or succeed again).
    pub fn set_failing(&self, canonical_name: &str, failing: bool) {
        let mut set = self.failing.lock().unwrap_or_else(PoisonError::into_inner);
        if failing {
            set.insert(canonical_name.to_string());
        } else {
            set.remove(canonical_name);
        }
    }

    /// Number of `decorate` calls made so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NameDecorator for StaticNames {
    async fn decorate(&self, canonical_name: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let failing = self
            .failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(canonical_name);
        if failing {
            return Err(CatalogError::DecorationFailed {
                name: canonical_name.to_string(),
                reason: "injected failure".to_string(),
            });
        }

        match self.names.get(canonical_name) {
            Some(localized) => Ok(localized.clone()),
            None if self.echo_missing => Ok(canonical_name.to_string()),
            None => Err(CatalogError::DecorationFailed {
                name: canonical_name.to_string(),
                reason: "no localized name".to_string(),
            }),
        }
    }
}
