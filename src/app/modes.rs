//! Scroll-trigger controller state.
//!
//! The controller has two states. It leaves [`ScrollPhase::Idle`] only when a
//! near-end signal arrives while no search is active, the paged cache reports
//! more data, and no fetch is in flight. It returns to `Idle` when that fetch
//! settles, successfully or not.
//!
//! ```text
//!            near-end ∧ ¬search ∧ has_more ∧ ¬in_flight / fetch next
//!   Idle ───────────────────────────────────────────────────────► AwaitingPage
//!    ▲                                                                │
//!    └──────────────────── page loaded or failed ◄────────────────────┘
//! ```

/// State of the scroll-trigger controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScrollPhase {
    /// Waiting for the next near-end signal.
    #[default]
    Idle,

    /// A scroll-triggered page fetch is outstanding.
    AwaitingPage {
        /// Offset of the outstanding fetch.
        offset: usize,
    },
}

impl ScrollPhase {
    #[must_use]
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }
}
