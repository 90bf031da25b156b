pub mod format;
pub mod telegram;

use async_trait::async_trait;

/// Outbound message boundary.
///
/// The Telegram implementation lives in [`telegram`]; tests substitute a
/// recording sink.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, text: &str) -> anyhow::Result<()>;
}
