//! Eagle bot entry point.
//!
//! Wires configuration, the store-backed ledger and the Telegram gateway
//! together, then runs the polling loop. Events are handled one at a time;
//! a failure inside one event is logged and the loop moves on, while a
//! transport failure of the poll itself backs off before retrying.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use eagle_bot::events::normalize;
use eagle_bot::gateway::telegram::TelegramGateway;
use eagle_bot::{AppState, BotConfig, SessionRouter};
use eagle_store::RocksStore;

/// Delay before retrying after a failed poll.
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,eagle=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Eagle bot");

    let config = BotConfig::from_env()?;
    tracing::info!(
        data_dir = %config.data_dir,
        group_check = ?config.group,
        initial_credits = config.initial_credits,
        "configuration loaded"
    );

    tracing::info!(path = %config.data_dir, "Opening RocksDB store");
    let store = Arc::new(RocksStore::open(&config.data_dir)?);

    let gateway = TelegramGateway::new(&config.bot_token, config.poll_timeout_seconds);

    // The bot's username feeds referral links; fall back to a placeholder
    // so a transient API failure at startup is not fatal.
    let bot_username = match gateway.bot_username().await {
        Ok(username) => username,
        Err(e) => {
            tracing::warn!(error = %e, "could not fetch bot username, using placeholder");
            "this_bot".to_string()
        }
    };
    tracing::info!(bot_username = %bot_username, "gateway connected");

    let state = AppState::new(config, store, bot_username)?;
    let router = SessionRouter::new(state);

    tracing::info!("Bot polling started");
    run_polling_loop(&router, &gateway).await;

    Ok(())
}

/// Pull updates forever, handling each event to completion.
async fn run_polling_loop(router: &SessionRouter, gateway: &TelegramGateway) {
    let mut offset = 0;

    loop {
        let updates = match gateway.poll_updates(offset).await {
            Ok(updates) => updates,
            Err(e) => {
                tracing::warn!(error = %e, "poll failed, backing off");
                tokio::time::sleep(POLL_RETRY_DELAY).await;
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);

            let Some(event) = normalize(update) else {
                continue;
            };

            // The event boundary: one event's failure never takes down the
            // loop.
            if let Err(e) = router.handle(gateway, event).await {
                tracing::error!(error = %e, "event handling failed");
            }
        }
    }
}
