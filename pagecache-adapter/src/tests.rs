use crate::*;

use pagecache::{
    ListEngineOptions, ListEvent, RebuildOutcome, RebuildType, RecordProvider, SlidingCacheOptions,
};
use std::string::{String, ToString};
use std::vec::Vec;

fn titles(n: usize) -> MemoryStore<String> {
    (0..n).map(|i| std::format!("track-{i:03}")).collect()
}

fn list(n: usize) -> ListController<String, Vec<ListEvent>> {
    ListController::with_observer(ListEngineOptions::new(40, 10), titles(n), Vec::new())
}

#[test]
fn memory_store_answers_from_current_records() {
    let mut store = titles(10);
    store.request_records(pagecache::FetchRequest {
        ticket: pagecache::Ticket(7),
        offset: 8,
        limit: 5,
    });
    assert!(store.has_pending());
    store.records_mut().truncate(9);

    let response = store.next_response().unwrap();
    assert_eq!(response.ticket, pagecache::Ticket(7));
    let page = response.page.unwrap();
    assert_eq!(page.records, ["track-008".to_string()]);
    assert_eq!(page.total_count, 9);
    assert!(store.next_response().is_none());
    assert_eq!(
        store.stats(),
        StoreStats {
            requested: 1,
            served: 1,
            failed: 0
        }
    );
}

#[test]
fn memory_store_can_fail_requests() {
    let mut store = titles(3);
    store.fail_next(1);
    for offset in [0, 1] {
        store.request_records(pagecache::FetchRequest {
            ticket: pagecache::Ticket(offset as u64),
            offset,
            limit: 1,
        });
    }
    assert!(store.next_response().unwrap().page.is_none());
    assert!(store.next_response().unwrap().page.is_some());
    assert_eq!(store.stats().failed, 1);
}

#[test]
fn memory_store_insert_and_remove_clamp() {
    let mut store: MemoryStore<u8> = [1, 2, 3].into_iter().collect();
    store.insert(100, 4);
    assert_eq!(store.records(), &[1, 2, 3, 4]);
    assert_eq!(store.remove(10), None);
    assert_eq!(store.remove(0), Some(1));
    assert_eq!(store.len(), 3);
}

#[test]
fn controller_settles_after_every_call() {
    let mut c = list(10);
    assert!(c.rebuild(RebuildType::Full, 0).is_issued());
    assert!(c.engine().window().len() >= 4);
    assert_eq!(c.page(), ["track-000", "track-001", "track-002", "track-003"]);

    assert!(c.next_page());
    assert_eq!(c.engine().start_index(), 4);
    assert!(c.next_page());
    assert_eq!(c.page(), ["track-008", "track-009"]);
    assert!(!c.next_page());

    assert!(c.previous_page());
    assert_eq!(c.engine().start_index(), 4);
    assert_eq!(c.focused().map(String::as_str), Some("track-007"));
}

#[test]
fn removing_a_record_rebuilds_in_place() {
    let mut c = list(10);
    c.rebuild(RebuildType::OnOffset, 8);
    assert_eq!(c.page(), ["track-008", "track-009"]);
    c.engine_mut().set_focus_index(1);

    assert_eq!(c.remove(9).as_deref(), Some("track-009"));
    assert_eq!(c.page(), ["track-008"]);
    assert_eq!(c.focused().map(String::as_str), Some("track-008"));

    // Emptying the last page falls back to the page before it.
    c.remove(8);
    assert_eq!(c.engine().start_index(), 4);
    assert_eq!(c.page().len(), 4);
}

#[test]
fn inserting_into_empty_list_renders_first_page() {
    let mut c = list(0);
    c.rebuild(RebuildType::Full, 0);
    assert!(c.engine().is_empty());

    c.insert(0, "intro".to_string());
    assert_eq!(c.page(), ["intro"]);
    let events = c.observer();
    assert_eq!(events.iter().filter(|e| **e == ListEvent::EmptyList).count(), 1);
    assert_eq!(events.iter().filter(|e| **e == ListEvent::NotEmptyList).count(), 1);
}

#[test]
fn out_of_range_offset_is_rejected_without_fetching() {
    let mut c = list(5);
    c.rebuild(RebuildType::Full, 0);
    let requested = c.store().stats().requested;
    assert!(matches!(
        c.rebuild(RebuildType::OnOffset, 5),
        RebuildOutcome::Rejected(_)
    ));
    assert_eq!(c.store().stats().requested, requested);
}

#[test]
fn failed_fetch_keeps_displayed_page() {
    let mut c = list(10);
    c.rebuild(RebuildType::Full, 0);
    c.engine_mut().provider_mut().fail_next(1);
    assert!(c.next_page());
    assert_eq!(c.engine().start_index(), 0);
    assert_eq!(c.page().len(), 4);
    assert_eq!(c.store().stats().failed, 1);
}

#[test]
fn resizing_viewport_repages() {
    let mut c = list(10);
    c.rebuild(RebuildType::Full, 0);
    c.on_viewport_size(20);
    assert_eq!(c.page(), ["track-000", "track-001"]);
}

#[test]
fn navigator_walks_whole_sequence_both_ways() {
    let options = SlidingCacheOptions::new(|t: &String| t.clone())
        .with_capacity(8)
        .with_edge_threshold(3);
    let mut nav = Navigator::new(options, titles(25));

    let mut visited = Vec::new();
    let mut key = nav.first();
    while let Some(k) = key {
        key = nav.next(&k);
        visited.push(k);
    }
    assert_eq!(visited.len(), 25);
    assert_eq!(visited.last().map(String::as_str), Some("track-024"));
    assert!(nav.cache().window().len() <= 8);

    let mut back = 0;
    let mut key = visited.last().cloned();
    while let Some(k) = key {
        key = nav.previous(&k);
        back += 1;
    }
    assert_eq!(back, 25);
    assert_eq!(nav.cache().window().offset(), 0);
}

#[test]
fn navigator_reload_returns_to_start() {
    let options = SlidingCacheOptions::new(|t: &String| t.clone())
        .with_capacity(8)
        .with_edge_threshold(3);
    let mut nav = Navigator::new(options, titles(25));
    let mut key = nav.first().unwrap();
    for _ in 0..12 {
        key = nav.next(&key).unwrap();
    }
    assert_eq!(nav.first(), None);

    nav.reload();
    assert_eq!(nav.first().as_deref(), Some("track-000"));
}
