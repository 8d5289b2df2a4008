//! Event handling and state transition logic.
//!
//! [`handle_event`] is the only place session state changes. It pattern-matches
//! one event, applies it to [`AppState`], and returns whether the view needs a
//! re-render plus the side effects to execute.
//!
//! # Architecture
//!
//! 1. Events arrive from the host (mount, scroll, input) or from the worker
//! 2. [`handle_event`] mutates `AppState` synchronously
//! 3. Actions are collected and returned; the session posts worker actions and
//!    hands presentation actions to the host
//!
//! Because every worker result re-enters through this function, the paged
//! cache and the bulk accumulator each have a single writer and need no locks.
//!
//! # Example
//!
//! ```rust
//! use scrolldex::app::{handle_event, Action, AppState, Event};
//! use scrolldex::Config;
//!
//! let mut state = AppState::new(&Config::default());
//! let (_, actions) = handle_event(&mut state, &Event::Mount)?;
//! assert_eq!(actions.len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::app::{Action, AppState, ScrollPhase};
use crate::domain::error::Result;
use crate::worker::{WorkerMessage, WorkerResponse};

/// Inputs to the session state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The catalog view was mounted: load the first page and start the bulk
    /// prefetch.
    Mount,

    /// The near-end sentinel became visible.
    NearEnd,

    /// Raw search input, possibly an intermediate composition state.
    ///
    /// Recorded but never filtered on.
    RawInput(String),

    /// The search text was committed (composition ended or a direct edit).
    Commit(String),

    /// Wraps a response from the background worker.
    WorkerResponse(WorkerResponse),
}

/// Processes an event, mutates state, and returns `(rerender, actions)`.
///
/// # Errors
///
/// Returns [`CatalogError::Worker`](crate::domain::CatalogError::Worker) when
/// a bulk batch arrives out of sequence. State is left unchanged in that case.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?EventKind::from(event)).entered();

    match event {
        Event::Mount => {
            let mut actions = vec![];

            // the paged cache is seeded once; later pages come from NearEnd
            if state.paged.pages().is_empty() && !state.paged.in_flight() {
                if let Some((offset, limit)) = state.paged.begin_fetch() {
                    tracing::debug!(offset, limit, "requesting first page");
                    actions.push(Action::PostToWorker(WorkerMessage::fetch_page(offset, limit)));
                }
            } else {
                tracing::debug!("first page already requested for this session");
            }

            if state.bulk.mark_started() {
                let settings = state.settings;
                tracing::debug!(
                    batch_size = settings.bulk_batch_size,
                    max_total = settings.bulk_max_total,
                    "starting bulk prefetch"
                );
                actions.push(Action::PostToWorker(WorkerMessage::start_bulk(
                    settings.bulk_batch_size,
                    settings.bulk_max_total,
                )));
            } else {
                tracing::debug!("bulk prefetch already started for this session");
            }

            Ok((true, actions))
        }
        Event::NearEnd => {
            if state.search.is_active() {
                tracing::trace!("near-end ignored while searching");
                return Ok((false, vec![]));
            }
            if !state.scroll.is_idle() {
                tracing::trace!(phase = ?state.scroll, "near-end ignored, page already requested");
                return Ok((false, vec![]));
            }

            let Some((offset, limit)) = state.paged.begin_fetch() else {
                return Ok((false, vec![]));
            };

            tracing::debug!(offset, limit, "near end, fetching next page");
            state.scroll = ScrollPhase::AwaitingPage { offset };
            Ok((
                true,
                vec![Action::PostToWorker(WorkerMessage::fetch_page(offset, limit))],
            ))
        }
        Event::RawInput(text) => {
            state.search.set_raw(text);
            Ok((true, vec![]))
        }
        Event::Commit(text) => {
            let changed = state.search.committed_text() != text.as_str();
            let started = state.search.commit(text);

            let mut actions = vec![];
            if started {
                tracing::debug!(query = %text, "new search started");
                actions.push(Action::ScrollToTop);
            }
            Ok((changed || started, actions))
        }
        Event::WorkerResponse(response) => handle_worker_response(state, response),
    }
}

fn handle_worker_response(state: &mut AppState, response: &WorkerResponse) -> Result<(bool, Vec<Action>)> {
    match response {
        WorkerResponse::PageLoaded { offset, page } => {
            let applied = state.paged.complete_fetch(*offset, Ok(page.clone()));
            settle_scroll(state, *offset);
            tracing::debug!(
                offset,
                entries = page.len(),
                has_more = page.has_more,
                applied,
                "page loaded"
            );
            Ok((applied && !state.search.is_active(), vec![]))
        }
        WorkerResponse::PageFailed { offset, failure } => {
            let applied = state.paged.complete_fetch(*offset, Err(failure.clone()));
            settle_scroll(state, *offset);
            tracing::warn!(offset, error = %failure, "page fetch failed, next near-end retries");
            Ok((applied, vec![]))
        }
        WorkerResponse::BulkSized { target, reported } => {
            tracing::debug!(target, reported, "bulk prefetch sized");
            state.bulk.set_target(*target);
            Ok((state.search.is_active(), vec![]))
        }
        WorkerResponse::BulkBatch { offset, entries } => {
            state.bulk.append(*offset, entries.clone())?;
            Ok((state.search.is_active(), vec![]))
        }
        WorkerResponse::BulkFinished { fetched } => {
            tracing::debug!(fetched, "bulk prefetch finished");
            state.bulk.finish();
            Ok((state.search.is_active(), vec![]))
        }
        WorkerResponse::BulkAborted { fetched, failure } => {
            tracing::debug!(fetched, error = %failure, "bulk prefetch aborted");
            state.bulk.abort(failure.clone());
            Ok((true, vec![]))
        }
    }
}

fn settle_scroll(state: &mut AppState, offset: usize) {
    if state.scroll == (ScrollPhase::AwaitingPage { offset }) {
        state.scroll = ScrollPhase::Idle;
    }
}

/// Payload-free event label for span fields; bulk batches can be large.
#[derive(Debug)]
enum EventKind {
    Mount,
    NearEnd,
    RawInput,
    Commit,
    Worker(&'static str),
}

impl From<&Event> for EventKind {
    fn from(event: &Event) -> Self {
        match event {
            Event::Mount => Self::Mount,
            Event::NearEnd => Self::NearEnd,
            Event::RawInput(_) => Self::RawInput,
            Event::Commit(_) => Self::Commit,
            Event::WorkerResponse(response) => Self::Worker(response.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::FetchSettings;
    use crate::catalog::{BulkStatus, ListMode};
    use crate::domain::{CatalogError, Entry, FetchFailure, Page};

    fn state() -> AppState {
        AppState::with_settings(FetchSettings {
            page_size: 2,
            bulk_batch_size: 3,
            bulk_max_total: 6,
        })
    }

    fn entry(id: &str, display: &str) -> Entry {
        Entry::new(id, display.to_lowercase(), display, id)
    }

    fn page(ids: &[(&str, &str)], has_more: bool) -> Page {
        Page::new(ids.iter().map(|(id, name)| entry(id, name)).collect(), has_more)
    }

    fn worker(state: &mut AppState, response: WorkerResponse) -> (bool, Vec<Action>) {
        handle_event(state, &Event::WorkerResponse(response)).unwrap()
    }

    fn unavailable() -> FetchFailure {
        FetchFailure::from(&CatalogError::SourceUnavailable("503".into()))
    }

    #[test]
    fn mount_requests_first_page_and_bulk() {
        let mut state = state();
        let (rerender, actions) = handle_event(&mut state, &Event::Mount).unwrap();

        assert!(rerender);
        assert_eq!(
            actions,
            vec![
                Action::PostToWorker(WorkerMessage::fetch_page(0, 2)),
                Action::PostToWorker(WorkerMessage::start_bulk(3, 6)),
            ]
        );
        assert_eq!(state.bulk.status(), BulkStatus::Running);
    }

    #[test]
    fn bulk_is_started_once_per_session() {
        let mut state = state();
        handle_event(&mut state, &Event::Mount).unwrap();
        worker(&mut state, WorkerResponse::PageLoaded { offset: 0, page: page(&[("1", "A")], true) });

        let (_, actions) = handle_event(&mut state, &Event::Mount).unwrap();
        assert!(actions.is_empty());
        assert_eq!(state.paged.entry_count(), 1);
        assert!(!state.paged.in_flight());
    }

    #[test]
    fn remount_does_not_fetch_while_first_page_is_pending_or_searching() {
        let mut state = state();
        handle_event(&mut state, &Event::Mount).unwrap();

        let (_, actions) = handle_event(&mut state, &Event::Mount).unwrap();
        assert!(actions.is_empty());

        worker(&mut state, WorkerResponse::PageLoaded { offset: 0, page: page(&[("1", "A"), ("2", "B")], true) });
        handle_event(&mut state, &Event::Commit("a".to_string())).unwrap();

        let (_, actions) = handle_event(&mut state, &Event::Mount).unwrap();
        assert!(actions.is_empty());
        assert!(!state.paged.in_flight());
        assert_eq!(state.paged.entry_count(), 2);
    }

    #[test]
    fn near_end_is_idempotent_while_in_flight() {
        let mut state = state();
        handle_event(&mut state, &Event::Mount).unwrap();
        worker(
            &mut state,
            WorkerResponse::PageLoaded { offset: 0, page: page(&[("1", "A"), ("2", "B")], true) },
        );

        let (_, first) = handle_event(&mut state, &Event::NearEnd).unwrap();
        assert_eq!(first, vec![Action::PostToWorker(WorkerMessage::fetch_page(2, 2))]);
        assert_eq!(state.scroll, ScrollPhase::AwaitingPage { offset: 2 });

        for _ in 0..5 {
            let (rerender, actions) = handle_event(&mut state, &Event::NearEnd).unwrap();
            assert!(!rerender);
            assert!(actions.is_empty());
        }

        worker(&mut state, WorkerResponse::PageLoaded { offset: 2, page: page(&[("3", "C")], false) });
        assert!(state.scroll.is_idle());
        assert_eq!(state.paged.entry_count(), 3);

        let (_, after_end) = handle_event(&mut state, &Event::NearEnd).unwrap();
        assert!(after_end.is_empty(), "no fetch once has_more is false");
    }

    #[test]
    fn near_end_is_suspended_during_search() {
        let mut state = state();
        handle_event(&mut state, &Event::Mount).unwrap();
        worker(&mut state, WorkerResponse::PageLoaded { offset: 0, page: page(&[("1", "A")], true) });
        handle_event(&mut state, &Event::Commit("a".into())).unwrap();

        let (_, actions) = handle_event(&mut state, &Event::NearEnd).unwrap();
        assert!(actions.is_empty());
        assert!(!state.paged.in_flight());

        handle_event(&mut state, &Event::Commit(String::new())).unwrap();
        let (_, actions) = handle_event(&mut state, &Event::NearEnd).unwrap();
        assert_eq!(actions, vec![Action::PostToWorker(WorkerMessage::fetch_page(2, 2))]);
    }

    #[test]
    fn failed_page_is_retried_by_next_near_end() {
        let mut state = state();
        handle_event(&mut state, &Event::Mount).unwrap();
        let (rerender, _) = worker(&mut state, WorkerResponse::PageFailed { offset: 0, failure: unavailable() });

        assert!(rerender);
        assert!(state.scroll.is_idle());
        assert_eq!(state.paged.next_offset(), 0);

        let (_, actions) = handle_event(&mut state, &Event::NearEnd).unwrap();
        assert_eq!(actions, vec![Action::PostToWorker(WorkerMessage::fetch_page(0, 2))]);
    }

    #[test]
    fn stale_page_response_is_ignored() {
        let mut state = state();
        handle_event(&mut state, &Event::Mount).unwrap();

        let (rerender, _) = worker(&mut state, WorkerResponse::PageLoaded { offset: 8, page: page(&[("9", "I")], true) });
        assert!(!rerender);
        assert_eq!(state.paged.entry_count(), 0);
        assert!(state.paged.in_flight());
    }

    #[test]
    fn raw_input_never_filters() {
        let mut state = state();
        handle_event(&mut state, &Event::RawInput("ㅍ".into())).unwrap();
        handle_event(&mut state, &Event::RawInput("피".into())).unwrap();

        assert_eq!(state.search.raw_text(), "피");
        assert_eq!(state.search.committed_text(), "");
        assert_eq!(state.visible_list().mode, ListMode::Browse);
    }

    #[test]
    fn scroll_to_top_once_per_new_search() {
        let mut state = state();

        let (_, first) = handle_event(&mut state, &Event::Commit("c".into())).unwrap();
        let (_, second) = handle_event(&mut state, &Event::Commit("ch".into())).unwrap();
        let (_, cleared) = handle_event(&mut state, &Event::Commit(String::new())).unwrap();
        let (_, again) = handle_event(&mut state, &Event::Commit("b".into())).unwrap();

        assert_eq!(first, vec![Action::ScrollToTop]);
        assert!(second.is_empty());
        assert!(cleared.is_empty());
        assert_eq!(again, vec![Action::ScrollToTop]);
    }

    #[test]
    fn whitespace_commit_stays_in_browse_mode() {
        let mut state = state();
        let (_, actions) = handle_event(&mut state, &Event::Commit("   ".into())).unwrap();

        assert!(actions.is_empty());
        assert!(!state.search_active());
    }

    #[test]
    fn search_switches_between_paged_and_bulk() {
        let mut state = state();
        handle_event(&mut state, &Event::Mount).unwrap();
        worker(
            &mut state,
            WorkerResponse::PageLoaded { offset: 0, page: page(&[("1", "Bulbasaur"), ("2", "Charmander")], true) },
        );
        worker(&mut state, WorkerResponse::BulkSized { target: 3, reported: 3 });
        worker(
            &mut state,
            WorkerResponse::BulkBatch {
                offset: 0,
                entries: vec![entry("1", "Bulbasaur"), entry("2", "Charmander"), entry("3", "Squirtle")],
            },
        );
        assert!(state.bulk.is_complete());

        handle_event(&mut state, &Event::Commit("char".into())).unwrap();
        assert_eq!(state.visible_list().ids(), vec!["2"]);

        handle_event(&mut state, &Event::Commit(String::new())).unwrap();
        assert_eq!(state.visible_list().ids(), vec!["1", "2"]);
    }

    #[test]
    fn out_of_sequence_bulk_batch_is_an_error() {
        let mut state = state();
        handle_event(&mut state, &Event::Mount).unwrap();
        worker(&mut state, WorkerResponse::BulkSized { target: 6, reported: 10 });

        let result = handle_event(
            &mut state,
            &Event::WorkerResponse(WorkerResponse::BulkBatch { offset: 3, entries: vec![entry("4", "D")] }),
        );
        assert!(matches!(result, Err(CatalogError::Worker(_))));
        assert!(state.bulk.is_empty());
    }

    #[test]
    fn bulk_abort_keeps_partial_data_searchable() {
        let mut state = state();
        handle_event(&mut state, &Event::Mount).unwrap();
        worker(&mut state, WorkerResponse::BulkSized { target: 6, reported: 6 });
        worker(
            &mut state,
            WorkerResponse::BulkBatch { offset: 0, entries: vec![entry("1", "Abra"), entry("2", "Kadabra")] },
        );
        worker(&mut state, WorkerResponse::BulkAborted { fetched: 2, failure: unavailable() });

        assert_eq!(state.bulk.status(), BulkStatus::Aborted);
        assert!(state.bulk.outcome().is_err());

        handle_event(&mut state, &Event::Commit("abra".into())).unwrap();
        assert_eq!(state.visible_list().ids(), vec!["1", "2"]);
    }
}
