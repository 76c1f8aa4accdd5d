//! pixsplit - Main entry point.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use pixsplit::config::Config;
use pixsplit::logging::init_logging;
use pixsplit::{Dispatcher, TelegramChannel};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    init_logging(
        &config.observability.log_level,
        &config.observability.log_format,
    );

    tracing::info!("pixsplit v{}", env!("CARGO_PKG_VERSION"));

    let channel = Arc::new(TelegramChannel::new(config.bot_token.clone()));

    if !channel.health_check().await {
        tracing::warn!("Telegram getMe failed; check the bot token");
    }

    let (tx, rx) = mpsc::channel(64);
    let listener = {
        let channel = channel.clone();
        tokio::spawn(async move {
            if let Err(e) = channel.listen(tx).await {
                tracing::error!("Telegram listener stopped: {e}");
            }
        })
    };

    let dispatcher = Dispatcher::new(channel, config.admin_chat_id);

    tokio::select! {
        () = dispatcher.run(rx) => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutting down");
        }
    }

    listener.abort();
    Ok(())
}
