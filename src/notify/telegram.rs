use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::notify::NotificationSink;

/// Callback payloads carried by the inline keyboard buttons.
pub const CB_SCAN: &str = "scan";
pub const CB_STATS: &str = "stats";

/// The two-button menu attached to every outbound message.
pub fn main_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([
        [InlineKeyboardButton::callback("📡 Check ratio", CB_SCAN)],
        [InlineKeyboardButton::callback("📊 52-week range", CB_STATS)],
    ])
}

/// Pushes change alerts to a fixed chat.
pub struct TelegramSink {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramSink {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

#[async_trait]
impl NotificationSink for TelegramSink {
    async fn send(&self, text: &str) -> anyhow::Result<()> {
        self.bot
            .send_message(self.chat_id, text)
            .reply_markup(main_keyboard())
            .await?;

        Ok(())
    }
}
