//! Infrastructure helpers for environment and URL handling.
//!
//! These utilities sit below the domain layer: resolving where trace files
//! live, expanding `~` in configured paths, and pulling resource ids out of
//! catalog item URLs.

pub mod paths;
pub mod urls;

pub use paths::{expand_tilde, get_data_dir};
pub use urls::resource_id;
