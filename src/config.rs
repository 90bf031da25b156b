use std::time::Duration;

use url::Url;

use crate::delivery::DeliveryMode;
use crate::error::AppError;
use crate::market::types::TrackedPair;

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Telegram bot token.
    pub telegram_token: String,

    /// Chat that receives change alerts.
    pub alert_chat_id: i64,

    /// Database connection string.
    pub database_url: String,

    /// Quote API base URL. Overridable so tests can point the client at a
    /// local stub.
    pub api_base_url: String,

    /// Tracked pair: upstream API ids plus display symbols.
    pub pair: TrackedPair,

    /// Reference currency for spot prices.
    pub vs_currency: String,

    /// Fiat currency the base price is converted into, best-effort.
    pub fx_currency: String,

    // =========================
    // Refresh configuration
    // =========================
    /// Freshness window of the spot-ratio cache.
    ///
    /// Within this window, user queries and detector ticks are served
    /// from memory without touching the upstream API.
    pub ratio_ttl: Duration,

    /// Freshness window of the 52-week range cache.
    ///
    /// The range moves slowly; a long TTL keeps the two market-chart
    /// calls rare.
    pub range_ttl: Duration,

    /// Cadence of the change-detector loop.
    pub check_interval: Duration,

    /// Per-request timeout of upstream HTTP calls. No retries; the next
    /// tick or user command is the implicit retry.
    pub http_timeout: Duration,

    // =========================
    // Delivery configuration
    // =========================
    /// How Telegram updates reach the bot.
    pub delivery: DeliveryMode,

    /// Public URL Telegram pushes webhook updates to (webhook mode only).
    pub webhook_url: Option<Url>,

    /// Local port of the webhook listener.
    pub webhook_port: u16,

    /// Port of the liveness endpoint.
    pub health_port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let telegram_token = require("TELEGRAM_BOT_TOKEN")?;
        let alert_chat_id = require("TELEGRAM_CHAT_ID")?
            .parse()
            .map_err(|_| AppError::InvalidConfig("TELEGRAM_CHAT_ID must be an integer".into()))?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://ratiowatch.db?mode=rwc".to_string());

        let api_base_url = std::env::var("COINGECKO_URL")
            .unwrap_or_else(|_| "https://api.coingecko.com/api/v3".to_string());

        let pair = TrackedPair {
            base_id: env_or("BASE_ASSET_ID", "ripple"),
            quote_id: env_or("QUOTE_ASSET_ID", "stellar"),
            base_symbol: env_or("BASE_ASSET_SYMBOL", "XRP"),
            quote_symbol: env_or("QUOTE_ASSET_SYMBOL", "XLM"),
        };

        let delivery = env_or("DELIVERY_MODE", "polling")
            .parse::<DeliveryMode>()
            .map_err(AppError::InvalidConfig)?;

        let webhook_url = std::env::var("WEBHOOK_URL")
            .ok()
            .map(|raw| {
                Url::parse(&raw)
                    .map_err(|e| AppError::InvalidConfig(format!("WEBHOOK_URL: {e}")))
            })
            .transpose()?;

        if delivery == DeliveryMode::Webhook && webhook_url.is_none() {
            return Err(AppError::MissingEnv("WEBHOOK_URL".to_string()));
        }

        Ok(Self {
            telegram_token,
            alert_chat_id,
            database_url,
            api_base_url,
            pair,
            vs_currency: env_or("VS_CURRENCY", "usd"),
            fx_currency: env_or("FX_CURRENCY", "rub"),

            // Refresh defaults:
            // - spot ratio stays fresh for 5 minutes
            // - the 52-week range for 6 hours
            // - the detector compares once an hour
            ratio_ttl: Duration::from_secs(env_secs("RATIO_TTL_SECS", 300)),
            range_ttl: Duration::from_secs(env_secs("RANGE_TTL_SECS", 6 * 60 * 60)),
            check_interval: Duration::from_secs(env_secs("CHECK_INTERVAL_SECS", 3_600)),
            http_timeout: Duration::from_secs(env_secs("HTTP_TIMEOUT_SECS", 10)),

            delivery,
            webhook_url,
            webhook_port: env_secs("WEBHOOK_PORT", 8443) as u16,
            health_port: env_secs("HEALTH_PORT", 8080) as u16,
        })
    }
}

fn require(key: &str) -> Result<String, AppError> {
    std::env::var(key).map_err(|_| AppError::MissingEnv(key.to_string()))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_secs(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
