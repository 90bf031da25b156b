use std::sync::Arc;
use std::sync::atomic::AtomicU64;

/// Minimal counters for operational visibility.
#[derive(Clone, Default)]
pub struct Counters {
    pub ticks: Arc<AtomicU64>,
    pub ticks_skipped: Arc<AtomicU64>,
    pub alerts_sent: Arc<AtomicU64>,
}
