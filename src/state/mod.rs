pub mod sqlite_store;

use serde::{Deserialize, Serialize};

use crate::cache::CacheEntry;
use crate::market::types::{SpotQuote, WeekRange};

/// Durable bot state.
///
/// `last_ratio` drives change detection; the cache snapshots let a
/// restart serve queries without immediately re-hitting the upstream API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackerState {
    pub last_ratio: Option<f64>,
    pub ratio_cache: Option<CacheEntry<SpotQuote>>,
    pub range_cache: Option<CacheEntry<WeekRange>>,
}

#[async_trait::async_trait]
pub trait StateStore: Send + Sync {
    async fn load(&self) -> anyhow::Result<TrackerState>;
    async fn save(&self, state: &TrackerState) -> anyhow::Result<()>;
}
