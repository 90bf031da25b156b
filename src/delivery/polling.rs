use std::sync::Arc;

use teloxide::prelude::*;
use tracing::info;

use crate::dispatch::Responder;

/// Long-polling delivery: the bot pulls updates from the Bot API.
pub async fn run(bot: Bot, responder: Arc<Responder>) {
    info!("starting telegram long-polling dispatcher");

    Dispatcher::builder(bot, super::handler())
        .dependencies(dptree::deps![responder])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
