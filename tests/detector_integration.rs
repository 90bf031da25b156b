
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use uuid::Uuid;

use ratiowatch::cache::range::RangeCache;
use ratiowatch::cache::ratio::RatioCache;
use ratiowatch::detector::{ChangeDetector, TickOutcome};
use ratiowatch::market::types::SpotQuote;
use ratiowatch::metrics::counters::Counters;
use ratiowatch::state::{StateStore, TrackerState};
use ratiowatch::state::sqlite_store::SqliteStateStore;

use mock_source::{ManualClock, RecordingSink, ScriptedSource, points, tracked_pair};

const RATIO_TTL: Duration = Duration::from_secs(300);
const RANGE_TTL: Duration = Duration::from_secs(6 * 60 * 60);

/// Isolated in-memory DB per test.
/// Unique name prevents test interference during parallel execution;
/// `cache=shared` lets multiple pools see the same in-memory DB.
async fn setup_store() -> (Arc<SqliteStateStore>, String) {
    let conn = format!("sqlite:file:{}?mode=memory&cache=shared", Uuid::new_v4());
    let store = SqliteStateStore::new(&conn).await.expect("state store");

    (Arc::new(store), conn)
}

struct Harness {
    detector: ChangeDetector,
    source: Arc<ScriptedSource>,
    sink: Arc<RecordingSink>,
    store: Arc<SqliteStateStore>,
    clock: Arc<ManualClock>,
}

async fn harness(source: ScriptedSource) -> Harness {
    let source = Arc::new(source);
    let clock = Arc::new(ManualClock::at(1_700_000_000_000));
    let (store, _) = setup_store().await;
    let sink = Arc::new(RecordingSink::default());

    Harness {
        detector: build_detector(&source, &clock, &store, sink.clone()),
        source,
        sink,
        store,
        clock,
    }
}

fn build_detector(
    source: &Arc<ScriptedSource>,
    clock: &Arc<ManualClock>,
    store: &Arc<SqliteStateStore>,
    sink: Arc<RecordingSink>,
) -> ChangeDetector {
    let ratio_cache = Arc::new(RatioCache::new(source.clone(), clock.clone(), RATIO_TTL));
    let range_cache = Arc::new(RangeCache::new(
        source.clone(),
        clock.clone(),
        tracked_pair(),
        RANGE_TTL,
    ));

    ChangeDetector::new(
        ratio_cache,
        range_cache,
        source.clone(),
        store.clone(),
        sink,
        tracked_pair(),
        "rub".into(),
        Counters::default(),
    )
}

#[tokio::test]
async fn first_tick_seeds_without_notifying() {
    let h = harness(ScriptedSource::with_spot(5.0, 0.5)).await;

    let outcome = h.detector.tick().await.expect("tick");

    assert_eq!(outcome, TickOutcome::Seeded(5.0));
    assert!(h.sink.sent.lock().is_empty());
    assert_eq!(h.store.load().await.expect("load").last_ratio, Some(5.0));
}

#[tokio::test]
async fn integer_part_must_move_to_alert() {
    let h = harness(ScriptedSource::with_spot(4.0, 0.4)).await;

    assert_eq!(h.detector.tick().await.expect("seed"), TickOutcome::Seeded(4.0));

    // 4.0 -> 4.99 keeps the integer part; not a reported change.
    h.clock.advance(RATIO_TTL.as_millis() as u64 + 1);
    *h.source.spot.lock() = Some(SpotQuote {
        ratio: 4.99,
        base_price: 0.49,
    });

    assert_eq!(
        h.detector.tick().await.expect("tick"),
        TickOutcome::Unchanged(4.99)
    );
    assert!(h.sink.sent.lock().is_empty());
    assert_eq!(h.store.load().await.expect("load").last_ratio, Some(4.0));
}

#[tokio::test]
async fn fractional_boundary_cross_alerts() {
    let h = harness(ScriptedSource::with_spot(4.0, 0.4)).await;
    *h.source.fx.lock() = Some(90.0);

    // 3.99 -> 4.00 crosses the integer boundary; this is a change.
    h.store
        .save(&TrackerState {
            last_ratio: Some(3.99),
            ..Default::default()
        })
        .await
        .expect("pre-seed");

    let outcome = h.detector.tick().await.expect("tick");

    assert_eq!(outcome, TickOutcome::Notified { old: 3.99, new: 4.0 });
    assert_eq!(h.sink.sent.lock().len(), 1);
    assert_eq!(h.store.load().await.expect("load").last_ratio, Some(4.0));
}

#[tokio::test]
async fn outage_with_no_history_skips_and_persists_nothing() {
    let h = harness(ScriptedSource::default()).await;

    let outcome = h.detector.tick().await.expect("tick");

    assert_eq!(outcome, TickOutcome::Skipped);
    assert!(h.sink.sent.lock().is_empty());
    assert_eq!(h.store.load().await.expect("load").last_ratio, None);
}

#[tokio::test]
async fn failed_send_leaves_last_ratio_untouched() {
    let h = harness(ScriptedSource::with_spot(6.2, 0.62)).await;
    h.sink.fail.store(true, Ordering::SeqCst);

    h.store
        .save(&TrackerState {
            last_ratio: Some(5.0),
            ..Default::default()
        })
        .await
        .expect("pre-seed");

    assert!(h.detector.tick().await.is_err());
    assert_eq!(h.store.load().await.expect("load").last_ratio, Some(5.0));
}

#[tokio::test]
async fn fx_outage_still_alerts_with_placeholder() {
    let source = ScriptedSource::with_spot(6.2, 0.62);
    *source.base_series.lock() = points(&[4.0, 1.0]);
    *source.quote_series.lock() = points(&[1.0, 2.0]);

    let h = harness(source).await;

    h.store
        .save(&TrackerState {
            last_ratio: Some(5.0),
            ..Default::default()
        })
        .await
        .expect("pre-seed");

    let outcome = h.detector.tick().await.expect("tick");
    assert_eq!(outcome, TickOutcome::Notified { old: 5.0, new: 6.2 });

    let sent = h.sink.sent.lock();
    let text = sent.first().expect("one alert");

    assert!(text.contains("Was: 1 XRP = 5 XLM"));
    assert!(text.contains("Now: 1 XRP = 6.2 XLM"));
    assert!(text.contains("≈ ? RUB"));
    assert!(text.contains("52-week low: 0.5 XLM"));
    assert!(text.contains("52-week high: 4 XLM"));

    assert_eq!(h.store.load().await.expect("load").last_ratio, Some(6.2));
}

#[tokio::test]
async fn restart_restores_cache_snapshots() {
    let source = Arc::new(ScriptedSource::with_spot(5.5, 0.55));
    let clock = Arc::new(ManualClock::at(1_700_000_000_000));
    let (store, conn) = setup_store().await;

    let detector = build_detector(&source, &clock, &store, Default::default());
    detector.tick().await.expect("seeding tick");
    assert_eq!(source.spot_calls.load(Ordering::SeqCst), 1);

    // Second process: same DB, a source that would fail if consulted.
    let dead_source = Arc::new(ScriptedSource::default());
    let store2 = Arc::new(SqliteStateStore::new(&conn).await.expect("reopen"));
    let detector2 = build_detector(&dead_source, &clock, &store2, Default::default());

    detector2.restore_caches().await.expect("restore");

    // Still within the TTL: served from the restored snapshot.
    assert_eq!(
        detector2.tick().await.expect("tick"),
        TickOutcome::Unchanged(5.5)
    );
    assert_eq!(dead_source.spot_calls.load(Ordering::SeqCst), 0);
}
