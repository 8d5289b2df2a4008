//! End-to-end session scenarios over the in-memory catalog.

use std::sync::Arc;
use std::time::Duration;

use scrolldex::app::ScrollPhase;
use scrolldex::catalog::{BulkStatus, ListMode};
use scrolldex::source::{InMemoryCatalog, StaticNames};
use scrolldex::ui::EmptyState;
use scrolldex::{Action, AppState, CatalogError, Config, Event, Session};

const NAMES: [&str; 7] = [
    "bulbasaur",
    "ivysaur",
    "venusaur",
    "charmander",
    "charmeleon",
    "charizard",
    "squirtle",
];

fn korean_names() -> StaticNames {
    StaticNames::new([
        ("bulbasaur", "이상해씨"),
        ("ivysaur", "이상해풀"),
        ("venusaur", "이상해꽃"),
        ("charmander", "파이리"),
        ("charmeleon", "리자드"),
        ("charizard", "리자몽"),
        ("squirtle", "꼬부기"),
    ])
}

fn config() -> Config {
    Config {
        page_size: 3,
        bulk_batch_size: 2,
        bulk_max_total: 100,
        ..Config::default()
    }
}

async fn apply_until(session: &mut Session, done: impl Fn(&AppState) -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !done(session.state()) {
            session.next_update().await.unwrap();
        }
    })
    .await
    .expect("session did not reach the expected state");
}

#[tokio::test]
async fn infinite_scroll_walks_the_catalog() {
    let catalog = Arc::new(InMemoryCatalog::from_names(&NAMES));
    let mut session = Session::start(&config(), catalog, Arc::new(korean_names())).unwrap();

    apply_until(&mut session, |s| s.paged().entry_count() == 3).await;
    let view = session.view();
    assert_eq!(view.mode, ListMode::Browse);
    assert_eq!(view.items[0].number, "No.001");
    assert_eq!(view.items[0].display_name, "이상해씨");
    assert!(view.status.show_sentinel);

    session.dispatch(&Event::NearEnd).unwrap();
    session.dispatch(&Event::NearEnd).unwrap();
    assert_eq!(session.state().scroll(), ScrollPhase::AwaitingPage { offset: 3 });

    apply_until(&mut session, |s| s.paged().entry_count() == 6).await;
    assert!(session.state().scroll().is_idle());

    session.dispatch(&Event::NearEnd).unwrap();
    apply_until(&mut session, |s| !s.paged().has_more()).await;

    let ids: Vec<String> = session.view().items.into_iter().map(|item| item.id).collect();
    assert_eq!(ids, ["1", "2", "3", "4", "5", "6", "7"]);
    assert!(!session.view().status.show_sentinel);

    // nothing left to fetch
    assert!(session.dispatch(&Event::NearEnd).unwrap().is_empty());
    assert!(!session.state().paged().in_flight());
}

#[tokio::test]
async fn search_runs_over_the_bulk_dataset() {
    let catalog = Arc::new(InMemoryCatalog::from_names(&NAMES));
    let mut session = Session::start(&config(), catalog.clone(), Arc::new(korean_names())).unwrap();

    assert_eq!(session.wait_for_bulk().await.unwrap(), BulkStatus::Complete);
    assert_eq!(session.state().bulk().len(), NAMES.len());
    assert!(session.bulk_outcome().is_ok());

    // composition keystrokes never filter
    session.dispatch(&Event::RawInput("ㄹ".to_string())).unwrap();
    assert_eq!(session.view().mode, ListMode::Browse);

    let actions = session.dispatch(&Event::Commit("리자".to_string())).unwrap();
    assert_eq!(actions, vec![Action::ScrollToTop]);

    let view = session.view();
    assert_eq!(view.mode, ListMode::Search);
    let ids: Vec<&str> = view.items.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, ["5", "6"]);
    assert_eq!(view.items[0].highlight_ranges, vec![(0, 2)]);

    // refining an active search does not scroll again
    let actions = session.dispatch(&Event::Commit("리자몽".to_string())).unwrap();
    assert!(actions.is_empty());
    assert_eq!(session.view().items.len(), 1);

    // canonical names are not searched
    session.dispatch(&Event::Commit("char".to_string())).unwrap();
    assert_eq!(session.view().empty_state, Some(EmptyState::NoMatches));

    session.dispatch(&Event::Commit(String::new())).unwrap();
    assert_eq!(session.view().mode, ListMode::Browse);

    // count listing plus four sequential batches of two
    let bulk_offsets: Vec<usize> = catalog
        .calls()
        .iter()
        .filter(|call| call.limit == 2 || (call.limit == 1 && call.offset == 6))
        .map(|call| call.offset)
        .collect();
    assert_eq!(bulk_offsets, [0, 2, 4, 6]);
}

#[tokio::test]
async fn near_end_is_ignored_while_searching() {
    let catalog = Arc::new(InMemoryCatalog::from_names(&NAMES));
    let mut session = Session::start(&config(), catalog.clone(), Arc::new(korean_names())).unwrap();
    apply_until(&mut session, |s| s.paged().entry_count() == 3).await;

    session.dispatch(&Event::Commit("이상".to_string())).unwrap();
    let page_calls_before = catalog.calls().iter().filter(|call| call.limit == 3).count();

    for _ in 0..3 {
        assert!(session.dispatch(&Event::NearEnd).unwrap().is_empty());
    }
    assert!(!session.state().paged().in_flight());

    session.wait_for_bulk().await.unwrap();
    let page_calls_after = catalog.calls().iter().filter(|call| call.limit == 3).count();
    assert_eq!(page_calls_before, page_calls_after);
}

#[tokio::test]
async fn failed_page_is_retried_on_next_scroll() {
    let catalog = Arc::new(InMemoryCatalog::from_names(&NAMES));
    catalog.set_failing(3, true);
    let mut session = Session::start(&config(), catalog.clone(), Arc::new(korean_names())).unwrap();
    apply_until(&mut session, |s| s.paged().entry_count() == 3).await;

    session.dispatch(&Event::NearEnd).unwrap();
    apply_until(&mut session, |s| s.paged().failure().is_some()).await;
    assert_eq!(session.state().paged().entry_count(), 3);
    assert!(session.state().scroll().is_idle());

    catalog.set_failing(3, false);
    session.dispatch(&Event::NearEnd).unwrap();
    apply_until(&mut session, |s| s.paged().entry_count() == 6).await;
    assert_eq!(session.view().status.page_failure, None);
}

#[tokio::test]
async fn aborted_bulk_keeps_partial_results() {
    let catalog = Arc::new(InMemoryCatalog::from_names(&NAMES));
    catalog.set_failing(4, true);
    let mut session = Session::start(&config(), catalog.clone(), Arc::new(korean_names())).unwrap();

    assert_eq!(session.wait_for_bulk().await.unwrap(), BulkStatus::Aborted);
    assert_eq!(session.state().bulk().len(), 4);
    assert!(matches!(
        session.bulk_outcome(),
        Err(CatalogError::BulkIncomplete { fetched: 4, target: 7 })
    ));

    // no retry of the failed batch
    let batch_at_four = catalog
        .calls()
        .iter()
        .filter(|call| call.offset == 4 && call.limit == 2)
        .count();
    assert_eq!(batch_at_four, 1);

    session.dispatch(&Event::Commit("파이".to_string())).unwrap();
    assert_eq!(session.view().items.len(), 1);
    session.dispatch(&Event::Commit("꼬부기".to_string())).unwrap();
    assert_eq!(session.view().empty_state, Some(EmptyState::NoMatches));
}

#[tokio::test]
async fn bulk_is_capped() {
    let catalog = Arc::new(InMemoryCatalog::from_names(&NAMES));
    let config = Config {
        bulk_max_total: 5,
        ..config()
    };
    let mut session = Session::start(&config, catalog, Arc::new(korean_names())).unwrap();

    assert_eq!(session.wait_for_bulk().await.unwrap(), BulkStatus::Complete);
    assert_eq!(session.state().bulk().len(), 5);
    assert_eq!(session.view().status.bulk_target, 5);

    session.dispatch(&Event::Commit("꼬부기".to_string())).unwrap();
    assert_eq!(session.view().empty_state, Some(EmptyState::NoMatches));
}

#[tokio::test]
async fn search_before_bulk_data_reports_loading() {
    let catalog = Arc::new(
        InMemoryCatalog::from_names(&NAMES).with_latency(|_, limit| {
            if limit == 2 {
                Duration::from_millis(200)
            } else {
                Duration::ZERO
            }
        }),
    );
    let mut session = Session::start(&config(), catalog, Arc::new(korean_names())).unwrap();

    session.dispatch(&Event::Commit("리자".to_string())).unwrap();
    let view = session.view();
    assert!(view.status.bulk_loading);
    assert_eq!(view.empty_state, Some(EmptyState::StillLoading));

    session.wait_for_bulk().await.unwrap();
    assert_eq!(session.view().items.len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn ending_a_session_discards_in_flight_work() {
    let catalog = Arc::new(
        InMemoryCatalog::from_names(&NAMES).with_latency(|_, _| Duration::from_millis(20)),
    );
    let session = Session::start(&config(), catalog.clone(), Arc::new(korean_names())).unwrap();
    session.end();

    // the bulk run keeps going on its own and completes without a receiver
    tokio::time::sleep(Duration::from_millis(400)).await;
    let bulk_batches = catalog.calls().iter().filter(|call| call.limit <= 2).count();
    assert_eq!(bulk_batches, 5);
}

#[tokio::test]
async fn drain_ready_applies_queued_responses() {
    let catalog = Arc::new(InMemoryCatalog::from_names(&NAMES));
    let mut session = Session::start(&config(), catalog, Arc::new(korean_names())).unwrap();

    // let the spawned tasks run to completion
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(session.drain_ready().unwrap());

    assert_eq!(session.state().paged().entry_count(), 3);
    assert!(session.state().bulk().is_complete());
    assert!(!session.drain_ready().unwrap());
}

#[tokio::test]
async fn next_update_waits_while_nothing_is_outstanding() {
    let catalog = Arc::new(InMemoryCatalog::from_names(&NAMES));
    let mut session = Session::start(&config(), catalog, Arc::new(korean_names())).unwrap();

    apply_until(&mut session, |s| s.paged().entry_count() == 3).await;
    assert_eq!(session.wait_for_bulk().await.unwrap(), BulkStatus::Complete);
    session.drain_ready().unwrap();

    let idle = tokio::time::timeout(Duration::from_millis(50), session.next_update()).await;
    assert!(idle.is_err());

    // a new request wakes it again
    session.dispatch(&Event::NearEnd).unwrap();
    apply_until(&mut session, |s| s.paged().entry_count() == 6).await;
}

#[tokio::test]
async fn empty_bulk_cap_searches_to_no_matches() {
    let catalog = Arc::new(InMemoryCatalog::from_names(&NAMES));
    let config = Config {
        bulk_max_total: 0,
        ..config()
    };
    let mut session = Session::start(&config, catalog, Arc::new(korean_names())).unwrap();

    assert_eq!(session.wait_for_bulk().await.unwrap(), BulkStatus::Complete);
    assert!(session.state().bulk().is_empty());

    session.dispatch(&Event::Commit("리자".to_string())).unwrap();
    let view = session.view();
    assert!(!view.status.bulk_loading);
    assert_eq!(view.empty_state, Some(EmptyState::NoMatches));
}
