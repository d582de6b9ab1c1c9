use std::net::SocketAddr;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use social_links_bot::config::{
    SettingsStore, SETTING_ACCOUNT_NAMES, SETTING_POST_ID, SETTING_RESPONSE_METHOD,
};
use social_links_bot::effects::HttpEffectClient;
use social_links_bot::scheduler::DEFAULT_SWEEP_INTERVAL_SECS;
use social_links_bot::server::{router, AppState};
use social_links_bot::types::Username;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "social_links_bot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bot_username = Username::new(
        std::env::var("SOCIAL_LINKS_BOT_USERNAME")
            .unwrap_or_else(|_| "social-links-bot".to_string()),
    );

    let effects_url = std::env::var("SOCIAL_LINKS_EFFECTS_URL")
        .unwrap_or_else(|_| "http://localhost:3100".to_string());
    let interpreter = HttpEffectClient::new(&effects_url).unwrap();

    let sweep_interval = std::env::var("SOCIAL_LINKS_SWEEP_INTERVAL_MINS")
        .ok()
        .and_then(|mins| mins.parse::<u64>().ok())
        .map(|mins| Duration::from_secs(mins * 60))
        .unwrap_or(Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS));

    // Settings normally arrive via PUT /settings; env vars seed an initial
    // config so the bot can run without an admin push.
    let settings = SettingsStore::seeded([
        (
            SETTING_POST_ID.to_string(),
            std::env::var("SOCIAL_LINKS_POST_ID").ok(),
        ),
        (
            SETTING_ACCOUNT_NAMES.to_string(),
            std::env::var("SOCIAL_LINKS_ACCOUNT_NAMES").ok(),
        ),
        (
            SETTING_RESPONSE_METHOD.to_string(),
            std::env::var("SOCIAL_LINKS_RESPONSE_METHOD").ok(),
        ),
    ]);

    let state = AppState::new(bot_username, settings, interpreter, sweep_interval);
    state.reconcile_sweep();

    let app = router(state);

    let addr: SocketAddr = std::env::var("SOCIAL_LINKS_BIND_ADDR")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));
    tracing::info!(effects_url = %effects_url, "listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
