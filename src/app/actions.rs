//! Actions representing side effects requested by the event handler.
//!
//! The handler itself never performs I/O. It returns a `Vec<Action>`; the
//! session executes worker actions and hands presentation actions back to the
//! boundary that owns the rendered list.
//!
//! # Example
//!
//! ```rust
//! use scrolldex::app::Action;
//! use scrolldex::worker::WorkerMessage;
//!
//! let actions = vec![
//!     Action::PostToWorker(WorkerMessage::fetch_page(0, 20)),
//!     Action::ScrollToTop,
//! ];
//! assert!(actions[1].is_presentation());
//! ```

use crate::worker::WorkerMessage;

/// Side effects produced by the event handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Posts a message to the background worker.
    PostToWorker(WorkerMessage),

    /// Resets the rendered list's scroll position to the top.
    ///
    /// Emitted once when a new search begins, not on every keystroke within it.
    ScrollToTop,
}

impl Action {
    /// Whether the action is meant for the presentation boundary rather than
    /// the worker.
    #[must_use]
    pub const fn is_presentation(&self) -> bool {
        matches!(self, Self::ScrollToTop)
    }
}
