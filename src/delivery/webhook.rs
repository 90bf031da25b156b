use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use teloxide::prelude::*;
use teloxide::update_listeners::webhooks;
use tracing::info;
use url::Url;

use crate::dispatch::Responder;

/// Webhook delivery: Telegram pushes updates to an embedded listener.
pub async fn run(
    bot: Bot,
    responder: Arc<Responder>,
    public_url: Url,
    port: u16,
) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!(%public_url, %addr, "starting telegram webhook dispatcher");

    let listener = webhooks::axum(bot.clone(), webhooks::Options::new(addr, public_url))
        .await
        .context("failed to register telegram webhook")?;

    Dispatcher::builder(bot, super::handler())
        .dependencies(dptree::deps![responder])
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("webhook update listener error"),
        )
        .await;

    Ok(())
}
