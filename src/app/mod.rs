//! Application layer coordinating state, events, and actions.
//!
//! Sits between the [`Session`](crate::session::Session) driver and the
//! catalog and worker layers.
//!
//! ```text
//! Host signals → Events → handle_event → State Mutations → Actions → Worker / Host
//!                             ↑                                        ↓
//!                             └──────────── Worker Responses ──────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effects emitted by the event handler
//! - [`handler`]: Event processing and state transitions
//! - [`modes`]: Scroll-trigger controller phase
//! - [`state`]: Session state container and view model computation

pub mod actions;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::ScrollPhase;
pub use state::{AppState, FetchSettings};
