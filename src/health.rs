use axum::{Router, routing::get};
use tracing::info;

/// Plain liveness endpoint for external uptime checks.
pub async fn serve(port: u16) -> anyhow::Result<()> {
    let app = Router::new().route("/", get(|| async { "Bot is alive!" }));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!(port, "liveness endpoint listening");

    axum::serve(listener, app).await?;

    Ok(())
}
