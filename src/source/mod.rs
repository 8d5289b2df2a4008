//! External collaborators consumed by the engine.
//!
//! This module defines the paged catalog source and name-decoration service as
//! async traits, the wire models they exchange, and two families of
//! implementations.
//!
//! # Architecture
//!
//! - [`backend`]: The [`CatalogSource`] and [`NameDecorator`] traits
//! - [`models`]: Listing and localized-name documents
//! - [`http`]: REST implementations built on `reqwest`
//! - [`memory`]: In-process implementations with call recording and failure injection
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use scrolldex::source::{CatalogSource, InMemoryCatalog, NameDecorator, StaticNames};
//!
//! let source: Arc<dyn CatalogSource> = Arc::new(InMemoryCatalog::from_names(&["pikachu"]));
//! let names: Arc<dyn NameDecorator> = Arc::new(StaticNames::new([("pikachu", "피카츄")]));
//! ```

pub mod backend;
pub mod http;
pub mod memory;
pub mod models;

pub use backend::{CatalogSource, NameDecorator};
pub use http::{HttpCatalogSource, HttpNameDecorator};
pub use memory::{InMemoryCatalog, ListCall, StaticNames};
pub use models::{ListItem, ListPage};
