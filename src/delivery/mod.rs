pub mod polling;
pub mod webhook;

use std::str::FromStr;
use std::sync::Arc;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::dispatch::Responder;
use crate::notify::telegram::{CB_SCAN, CB_STATS, main_keyboard};

/// How Telegram updates reach the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Long polling against the Bot API.
    Polling,
    /// Inbound webhook served by an embedded listener.
    Webhook,
}

impl FromStr for DeliveryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "polling" => Ok(Self::Polling),
            "webhook" => Ok(Self::Webhook),
            other => Err(format!("unknown delivery mode '{other}'")),
        }
    }
}

/// Commands understood in chat.
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    /// Show the action menu.
    Start,
    /// Show the current ratio.
    Scan,
    /// Show the 52-week range.
    Stats,
}

/// Update-routing tree shared by both delivery adapters.
pub fn handler() -> UpdateHandler<teloxide::RequestError> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(Update::filter_callback_query().endpoint(handle_callback))
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    responder: Arc<Responder>,
) -> ResponseResult<()> {
    let text = match cmd {
        Command::Start => responder.show_menu(),
        Command::Scan => responder.show_ratio().await,
        Command::Stats => responder.show_range().await,
    };

    bot.send_message(msg.chat.id, text)
        .reply_markup(main_keyboard())
        .await?;

    Ok(())
}

async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    responder: Arc<Responder>,
) -> ResponseResult<()> {
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(message) = q.message else {
        return Ok(());
    };

    let text = match q.data.as_deref() {
        Some(CB_SCAN) => responder.show_ratio().await,
        Some(CB_STATS) => responder.show_range().await,
        _ => return Ok(()),
    };

    bot.edit_message_text(message.chat().id, message.id(), text)
        .reply_markup(main_keyboard())
        .await?;

    Ok(())
}
