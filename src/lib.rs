//! Scrolldex: catalog acquisition and search synchronization for an
//! infinite-scroll collection browser.
//!
//! Scrolldex keeps a long, remotely hosted catalog browsable and searchable:
//! - Paged fetching for infinite scroll, with at most one page in flight
//! - A one-shot background prefetch of the whole (capped) catalog for search
//! - Per-entry name decoration (localized display names) fetched concurrently
//! - Two-stage search input that filters only on committed text
//! - Scroll signals that are suspended while a search is active

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Host (scroll sentinel, search box, renderer)       │
//! └─────────────────────────────────────────────────────┘
//!              │ Event                 ▲ CatalogViewModel, ScrollToTop
//! ┌─────────────────────────────────────────────────────┐
//! │  Session (session.rs)                               │
//! │  - handle_event over AppState (app/)                │
//! │  - executes PostToWorker actions                    │
//! └─────────────────────────────────────────────────────┘
//!              │ WorkerMessage         ▲ WorkerResponse
//! ┌─────────────────────────────────────────────────────┐
//! │  Worker (worker/) → tokio tasks                     │
//! │  - page fetches, the sequential bulk run            │
//! └─────────────────────────────────────────────────────┘
//!              │
//! ┌───────────────────────┐   ┌─────────────────────────┐
//! │ Catalog (catalog/)    │   │ Sources (source/)       │
//! │ - fetcher, paged      │──►│ - CatalogSource         │
//! │ - bulk, search        │   │ - NameDecorator         │
//! └───────────────────────┘   └─────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Event/action state machine and view model computation
//! - [`catalog`]: Page fetcher, paged cache, bulk prefetcher, search
//! - [`config`]: TOML and key/value configuration
//! - [`domain`]: `Entry`, `Page` and error types
//! - [`infrastructure`]: Data directory and URL helpers
//! - [`observability`]: OpenTelemetry tracing with file export
//! - [`session`]: Drives one mounted catalog view
//! - [`source`]: Catalog and decoration backends (HTTP and in-memory)
//! - [`ui`]: View model types
//! - [`worker`]: Background I/O tasks and their message protocol
//!
//! # Configuration
//!
//! ```toml
//! base_url = "https://pokeapi.co/api/v2"
//! language = "ko"
//! page_size = 20
//! bulk_batch_size = 100
//! bulk_max_total = 1025
//! trace_level = "scrolldex=debug"
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use scrolldex::source::{InMemoryCatalog, StaticNames};
//! use scrolldex::{Config, Event, Session};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> scrolldex::Result<()> {
//! let catalog = Arc::new(InMemoryCatalog::from_names(&["bulbasaur", "ivysaur", "venusaur"]));
//! let names = Arc::new(StaticNames::echo());
//!
//! let mut session = Session::start(&Config::default(), catalog, names)?;
//! session.wait_for_bulk().await?;
//!
//! session.dispatch(&Event::Commit("saur".to_string()))?;
//! assert_eq!(session.view().items.len(), 3);
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod session;
pub mod source;
pub mod ui;
pub mod worker;

pub use app::{handle_event, Action, AppState, Event};
pub use config::Config;
pub use domain::{CatalogError, Entry, FailureKind, Page, Result};
pub use session::Session;
pub use ui::CatalogViewModel;

/// Creates the state for a host that drives [`handle_event`] itself.
///
/// Installs tracing first when `trace_level` is configured; a tracing setup
/// failure is logged and otherwise ignored.
///
/// ```rust
/// use scrolldex::{handle_event, initialize, Config, Event};
///
/// let mut state = initialize(&Config::default());
/// let (_, actions) = handle_event(&mut state, &Event::Mount)?;
/// assert_eq!(actions.len(), 2);
/// # Ok::<(), scrolldex::CatalogError>(())
/// ```
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    if config.trace_level.is_some() {
        if let Err(e) = observability::init_tracing(config) {
            tracing::warn!(error = %e, "tracing unavailable");
        }
    }

    let config = config.clone().normalized();
    tracing::debug!(
        page_size = config.page_size,
        bulk_batch_size = config.bulk_batch_size,
        bulk_max_total = config.bulk_max_total,
        language = %config.language,
        "initializing catalog state"
    );
    AppState::new(&config)
}
