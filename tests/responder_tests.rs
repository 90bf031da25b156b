
use std::sync::Arc;
use std::time::Duration;

use ratiowatch::cache::range::RangeCache;
use ratiowatch::cache::ratio::RatioCache;
use ratiowatch::dispatch::Responder;

use mock_source::{ManualClock, ScriptedSource, points, tracked_pair};

fn responder(source: ScriptedSource) -> Responder {
    let source = Arc::new(source);
    let clock = Arc::new(ManualClock::at(1_700_000_000_000));

    let ratio_cache = Arc::new(RatioCache::new(
        source.clone(),
        clock.clone(),
        Duration::from_secs(300),
    ));
    let range_cache = Arc::new(RangeCache::new(
        source.clone(),
        clock,
        tracked_pair(),
        Duration::from_secs(6 * 60 * 60),
    ));

    Responder::new(ratio_cache, range_cache, source, tracked_pair(), "rub".into())
}

#[tokio::test]
async fn show_ratio_renders_price_and_conversion() {
    let source = ScriptedSource::with_spot(6.2, 0.62);
    *source.fx.lock() = Some(90.0);

    let text = responder(source).show_ratio().await;

    assert!(text.contains("📡 1 XRP = 6.2 XLM"));
    assert!(text.contains("≈ 0.62 USD ≈ 55.8 RUB"));
}

#[tokio::test]
async fn show_ratio_apologizes_on_outage() {
    let text = responder(ScriptedSource::default()).show_ratio().await;

    assert!(text.starts_with("⚠️"));
}

#[tokio::test]
async fn show_range_renders_low_and_high() {
    let source = ScriptedSource::default();
    *source.base_series.lock() = points(&[4.0, 1.0]);
    *source.quote_series.lock() = points(&[1.0, 2.0]);

    let text = responder(source).show_range().await;

    assert!(text.contains("🔻 Low: 0.5 XLM"));
    assert!(text.contains("🔺 High: 4 XLM"));
}

#[tokio::test]
async fn show_range_apologizes_when_series_unavailable() {
    let text = responder(ScriptedSource::default()).show_range().await;

    assert_eq!(text, "⚠️ Could not load 52-week data.");
}

#[tokio::test]
async fn show_menu_offers_the_actions() {
    let text = responder(ScriptedSource::default()).show_menu();

    assert_eq!(text, "Choose an action:");
}
