//! Wire models for the paged catalog source and the name-decoration service.
//!
//! These types mirror the JSON documents returned by the REST catalog and are
//! also what in-memory sources produce, so every [`CatalogSource`] speaks the
//! same listing shape.
//!
//! [`CatalogSource`]: super::CatalogSource

use serde::{Deserialize, Serialize};

/// One raw, undecorated catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    /// Canonical name of the item.
    pub name: String,
    /// Resource URL; its last path segment is the item's id.
    pub url: String,
}

impl ListItem {
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// One listing returned by `list(offset, limit)`.
///
/// ```json
/// {
///   "count": 1025,
///   "next": "https://host/api/v2/pokemon-species?offset=20&limit=20",
///   "previous": null,
///   "results": [{ "name": "bulbasaur", "url": "https://host/api/v2/pokemon-species/1/" }]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPage {
    /// Total size of the catalog as reported by the source.
    #[serde(default)]
    pub count: usize,

    /// URL of the next listing, `None` once the source is exhausted.
    #[serde(default)]
    pub next: Option<String>,

    /// Items of this listing, in source order.
    #[serde(rename = "results", default)]
    pub items: Vec<ListItem>,
}

impl ListPage {
    /// Returns whether the source reported a continuation.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }
}

/// Response of the name-decoration endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NamesResponse {
    #[serde(default)]
    pub names: Vec<LocalizedName>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LocalizedName {
    pub name: String,
    pub language: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NamedResource {
    pub name: String,
}

impl NamesResponse {
    /// Picks the name localized for `language`.
    pub(crate) fn localized(&self, language: &str) -> Option<&str> {
        self.names
            .iter()
            .find(|entry| entry.language.name == language)
            .map(|entry| entry.name.as_str())
    }
}
