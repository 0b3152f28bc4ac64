use std::error::Error;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pizza_bot::adapters::catalog::{MoltinCatalogClient, MoltinConfig};
use pizza_bot::adapters::geocoder::{YandexConfig, YandexGeocoder};
use pizza_bot::adapters::session::RedisSessionStore;
use pizza_bot::adapters::telegram::{
    PollingDispatcher, TelegramClient, TelegramConfig, TelegramTransport,
};
use pizza_bot::application::{ConversationEngine, EngineSettings};
use pizza_bot::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);
    tracing::info!(
        environment = ?config.bot.environment,
        workers = config.bot.workers,
        "Starting pizza bot"
    );

    let sessions = tokio::time::timeout(
        config.redis.timeout(),
        RedisSessionStore::connect(&config.redis.url, config.redis.key_prefix.clone()),
    )
    .await??;

    let catalog = MoltinCatalogClient::new(
        MoltinConfig::new(config.catalog.client_id.clone(), config.catalog.client_secret.clone())
            .with_base_url(config.catalog.base_url.clone())
            .with_flows(
                config.catalog.pizzeria_flow.clone(),
                config.catalog.customer_address_flow.clone(),
            )
            .with_timeout(config.catalog.timeout()),
    )?;

    let geocoder = YandexGeocoder::new(
        YandexConfig::new(config.geocoder.api_key.clone())
            .with_base_url(config.geocoder.base_url.clone())
            .with_timeout(config.geocoder.timeout()),
    )?;

    let client = Arc::new(TelegramClient::new(
        TelegramConfig::new(config.bot.telegram_token.clone())
            .with_api_url(config.bot.api_url.clone())
            .with_poll_timeout(config.bot.poll_timeout()),
    )?);

    let engine = ConversationEngine::new(
        Arc::new(sessions),
        Arc::new(catalog),
        Arc::new(geocoder),
        Arc::new(TelegramTransport::new(Arc::clone(&client))),
    )
    .with_settings(EngineSettings {
        follow_up_delay: config.bot.follow_up_delay(),
    });

    PollingDispatcher::new(client, engine, config.bot.workers).run().await;

    tracing::info!("Pizza bot stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.bot.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}
