mod common;

use statsbomb_viewer::cache::{LruCache, MemoCache, NoCache};
use statsbomb_viewer::lineup::{TeamRoster, fetch_lineup, lineup_url};
use statsbomb_viewer::match_list::{MatchListView, fetch_match_list};
use statsbomb_viewer::telemetry::{EventLog, FetchEvent};

use common::{BASE, StubSource, read_fixture};

const MATCHES_URL: &str = "http://stub/data/matches/11/90.json";

#[test]
fn not_found_degrades_to_empty_and_reports_status() {
    let source = StubSource::new();
    let mut cache: LruCache<String, MatchListView> = LruCache::new(4);
    let mut log = EventLog::new();

    let view = fetch_match_list(&source, &mut cache, &mut log, MATCHES_URL);

    assert!(view.is_empty());
    let failures: Vec<&FetchEvent> = log.failures().collect();
    assert_eq!(failures.len(), 1);
    assert!(matches!(
        failures[0],
        FetchEvent::FetchFailure { status: Some(404), url, .. } if url == MATCHES_URL
    ));
    assert!(log.lines().iter().any(|l| l.starts_with("[WARN]")));
}

#[test]
fn transport_error_reports_without_status() {
    let source = StubSource::new().offline(MATCHES_URL);
    let mut cache: LruCache<String, MatchListView> = LruCache::new(4);
    let mut log = EventLog::new();

    let view = fetch_match_list(&source, &mut cache, &mut log, MATCHES_URL);

    assert!(view.is_empty());
    let Some(FetchEvent::FetchFailure { status, reason, .. }) = log.failures().next() else {
        panic!("expected a fetch failure");
    };
    assert_eq!(*status, None);
    assert!(reason.contains("connection refused"));
}

#[test]
fn wrong_payload_shape_is_a_failure() {
    let source = StubSource::new().with(MATCHES_URL, 200, r#"{"error": "nope"}"#);
    let mut cache: LruCache<String, MatchListView> = LruCache::new(4);
    let mut log = EventLog::new();

    assert!(fetch_match_list(&source, &mut cache, &mut log, MATCHES_URL).is_empty());
    assert_eq!(log.failures().count(), 1);
    assert!(cache.is_empty());
}

#[test]
fn repeated_fetch_is_served_from_cache() {
    let source = StubSource::new().with(MATCHES_URL, 200, &read_fixture("matches_11_90.json"));
    let mut cache: LruCache<String, MatchListView> = LruCache::new(4);
    let mut log = EventLog::new();

    let first = fetch_match_list(&source, &mut cache, &mut log, MATCHES_URL);
    let second = fetch_match_list(&source, &mut cache, &mut log, MATCHES_URL);

    assert_eq!(first, second);
    assert_eq!(first.len(), 4);
    assert_eq!(source.calls_to(MATCHES_URL), 1);
    assert!(
        log.events()
            .iter()
            .any(|e| matches!(e, FetchEvent::CacheHit { .. }))
    );
    // One element in the fixture lacks an away team.
    assert_eq!(
        log.events()
            .iter()
            .filter(|e| matches!(e, FetchEvent::MalformedRecord { index: 3, .. }))
            .count(),
        1
    );
}

#[test]
fn failures_are_not_cached() {
    let source = StubSource::new();
    let mut cache: LruCache<String, MatchListView> = LruCache::new(4);
    let mut log = EventLog::new();

    fetch_match_list(&source, &mut cache, &mut log, MATCHES_URL);
    fetch_match_list(&source, &mut cache, &mut log, MATCHES_URL);

    assert_eq!(source.calls_to(MATCHES_URL), 2);
    assert_eq!(log.failures().count(), 2);
    assert!(cache.is_empty());
}

#[test]
fn empty_or_no_content_responses_are_failures_and_not_cached() {
    let blank = "http://stub/data/matches/11/42.json";
    let source = StubSource::new()
        .with(MATCHES_URL, 204, "")
        .with(blank, 200, "  ")
        .with(&lineup_url(BASE, 7), 204, "");
    let mut matches: LruCache<String, MatchListView> = LruCache::new(4);
    let mut lineups: LruCache<u64, TeamRoster> = LruCache::new(4);
    let mut log = EventLog::new();

    assert!(fetch_match_list(&source, &mut matches, &mut log, MATCHES_URL).is_empty());
    assert!(fetch_match_list(&source, &mut matches, &mut log, blank).is_empty());
    assert!(fetch_lineup(&source, &mut lineups, &mut log, BASE, 7).is_empty());

    assert!(matches.is_empty());
    assert!(lineups.is_empty());
    let statuses: Vec<Option<u16>> = log
        .failures()
        .map(|e| match e {
            FetchEvent::FetchFailure { status, .. } => *status,
            _ => None,
        })
        .collect();
    assert_eq!(statuses, vec![Some(204), Some(200), Some(204)]);

    // A second visit goes back to the source.
    fetch_match_list(&source, &mut matches, &mut log, MATCHES_URL);
    assert_eq!(source.calls_to(MATCHES_URL), 2);
}

#[test]
fn no_cache_always_refetches() {
    let source = StubSource::new().with(MATCHES_URL, 200, &read_fixture("matches_11_90.json"));
    let mut cache = NoCache;
    let mut log = EventLog::new();

    for _ in 0..3 {
        assert_eq!(fetch_match_list(&source, &mut cache, &mut log, MATCHES_URL).len(), 4);
    }
    assert_eq!(source.calls_to(MATCHES_URL), 3);
}

#[test]
fn lineup_is_cached_by_match_id() {
    let url = lineup_url(BASE, 3773386);
    let source = StubSource::new().with(&url, 200, &read_fixture("lineup_3773386.json"));
    let mut cache: LruCache<u64, TeamRoster> = LruCache::new(2);
    let mut log = EventLog::new();

    let roster = fetch_lineup(&source, &mut cache, &mut log, BASE, 3773386);
    let again = fetch_lineup(&source, &mut cache, &mut log, BASE, 3773386);

    assert_eq!(roster, again);
    assert_eq!(roster.teams().len(), 2);
    assert_eq!(source.calls_to(&url), 1);
    assert!(cache.contains(&3773386));
}

#[test]
fn missing_lineup_is_an_empty_roster() {
    let source = StubSource::new();
    let mut cache: LruCache<u64, TeamRoster> = LruCache::new(2);
    let mut log = EventLog::new();

    let roster = fetch_lineup(&source, &mut cache, &mut log, BASE, 42);

    assert!(roster.is_empty());
    assert_eq!(source.calls_to("http://stub/data/lineups/42.json"), 1);
    assert!(matches!(
        log.failures().next(),
        Some(FetchEvent::FetchFailure { status: Some(404), .. })
    ));
}
