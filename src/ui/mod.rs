//! Presentation boundary.
//!
//! Rendering is left to the host; this module only defines the read-only view
//! model the host renders:
//!
//! ```text
//! AppState → compute_viewmodel → CatalogViewModel → host renderer
//! ```

pub mod viewmodel;

pub use viewmodel::{CatalogViewModel, DisplayItem, EmptyState, ListStatus};
