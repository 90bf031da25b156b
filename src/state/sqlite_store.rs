//! SqliteStateStore
//! --------------------
//! SQLite-backed implementation of the `StateStore` trait. Keeps the
//! tracker usable across restarts:
//!
//!  - the last reported ratio survives, so no duplicate first-run seeding
//!  - cache snapshots survive, so a restart inside a TTL window does not
//!    re-hit the upstream API

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use super::{StateStore, TrackerState};
use crate::cache::CacheEntry;
use crate::market::types::{SpotQuote, WeekRange};

/// Single-row persistence backend for [`TrackerState`].
///
/// `save()` uses INSERT OR UPDATE semantics:
/// - no row yet → inserted
/// - existing row → updated
pub struct SqliteStateStore {
    pool: SqlitePool,
}

impl SqliteStateStore {
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect and ensure the schema exists.
    pub async fn new(url: &str) -> anyhow::Result<Self> {
        let pool = SqlitePool::connect(url).await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tracker_state (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                last_ratio REAL,
                ratio_cache_json TEXT,
                range_cache_json TEXT
            );
        "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl StateStore for SqliteStateStore {
    async fn load(&self) -> anyhow::Result<TrackerState> {
        let row = sqlx::query(
            "SELECT last_ratio, ratio_cache_json, range_cache_json FROM tracker_state WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(TrackerState::default());
        };

        let last_ratio: Option<f64> = row.get("last_ratio");

        let ratio_cache = row
            .get::<Option<String>, _>("ratio_cache_json")
            .map(|json| serde_json::from_str::<CacheEntry<SpotQuote>>(&json))
            .transpose()
            .map_err(|e| anyhow::anyhow!("invalid ratio cache JSON: {}", e))?;

        let range_cache = row
            .get::<Option<String>, _>("range_cache_json")
            .map(|json| serde_json::from_str::<CacheEntry<WeekRange>>(&json))
            .transpose()
            .map_err(|e| anyhow::anyhow!("invalid range cache JSON: {}", e))?;

        Ok(TrackerState {
            last_ratio,
            ratio_cache,
            range_cache,
        })
    }

    async fn save(&self, state: &TrackerState) -> anyhow::Result<()> {
        let ratio_json = state
            .ratio_cache
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let range_json = state
            .range_cache
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        sqlx::query(
            r#"
            INSERT INTO tracker_state (id, last_ratio, ratio_cache_json, range_cache_json)
            VALUES (1, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                last_ratio = excluded.last_ratio,
                ratio_cache_json = excluded.ratio_cache_json,
                range_cache_json = excluded.range_cache_json;
        "#,
        )
        .bind(state.last_ratio)
        .bind(ratio_json)
        .bind(range_json)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
