use std::sync::Arc;

use teloxide::prelude::*;

use ratiowatch::{
    cache::{range::RangeCache, ratio::RatioCache},
    config::AppConfig,
    delivery::{self, DeliveryMode},
    detector::{ChangeDetector, run_detector_loop},
    dispatch::Responder,
    health,
    logger::init_tracing,
    market::{PriceSource, coingecko::CoinGeckoClient},
    metrics::counters::Counters,
    notify::telegram::TelegramSink,
    state::sqlite_store::SqliteStateStore,
    time::SystemClock,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let is_production = std::env::var("APP_ENV").unwrap_or_default() == "production";
    init_tracing(is_production);

    tracing::info!("Starting ratiowatch...");

    let cfg = AppConfig::from_env()?;

    let source: Arc<dyn PriceSource> = Arc::new(CoinGeckoClient::new(
        cfg.api_base_url.clone(),
        cfg.pair.clone(),
        cfg.vs_currency.clone(),
        cfg.http_timeout,
    )?);
    let clock = Arc::new(SystemClock);

    let ratio_cache = Arc::new(RatioCache::new(
        source.clone(),
        clock.clone(),
        cfg.ratio_ttl,
    ));
    let range_cache = Arc::new(RangeCache::new(
        source.clone(),
        clock,
        cfg.pair.clone(),
        cfg.range_ttl,
    ));

    let store = Arc::new(SqliteStateStore::new(&cfg.database_url).await?);

    let bot = Bot::new(cfg.telegram_token.clone());
    let sink = Arc::new(TelegramSink::new(bot.clone(), ChatId(cfg.alert_chat_id)));

    let detector = Arc::new(ChangeDetector::new(
        ratio_cache.clone(),
        range_cache.clone(),
        source.clone(),
        store,
        sink,
        cfg.pair.clone(),
        cfg.fx_currency.clone(),
        Counters::default(),
    ));
    detector.restore_caches().await?;

    tokio::spawn(run_detector_loop(detector, cfg.check_interval));

    let health_port = cfg.health_port;
    tokio::spawn(async move {
        if let Err(e) = health::serve(health_port).await {
            tracing::error!(error = ?e, "liveness endpoint failed");
        }
    });

    let responder = Arc::new(Responder::new(
        ratio_cache,
        range_cache,
        source,
        cfg.pair.clone(),
        cfg.fx_currency.clone(),
    ));

    match cfg.delivery {
        DeliveryMode::Polling => delivery::polling::run(bot, responder).await,
        DeliveryMode::Webhook => {
            let Some(url) = cfg.webhook_url.clone() else {
                anyhow::bail!("webhook delivery selected without WEBHOOK_URL");
            };
            delivery::webhook::run(bot, responder, url, cfg.webhook_port).await?;
        }
    }

    Ok(())
}
