use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use airimpact::api::AppState;
use airimpact::cache::PersistentCache;
use airimpact::config::AirImpactConfig;
use airimpact::providers::llm::GroqClient;
use airimpact::providers::mapbox::MapboxClient;
use airimpact::providers::waqi::WaqiClient;
use airimpact::web;

fn init_tracing(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("airimpact={level},tower_http=warn")));

    if format == "json" {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AirImpactConfig::load()?;
    init_tracing(&config.logging.level, &config.logging.format);

    let cache = Arc::new(
        PersistentCache::open(&config.cache.location)
            .with_context(|| format!("Failed to open cache at {}", config.cache.location))?,
    );

    let mapbox = Arc::new(MapboxClient::new(&config.routing)?);

    let waqi = match &config.aqi.api_key {
        Some(token) => Some(Arc::new(WaqiClient::new(
            &config.aqi,
            token.clone(),
            Arc::clone(&cache),
        )?)),
        None => {
            tracing::warn!("No AQI API key configured; live air-quality endpoints are disabled");
            None
        }
    };

    let llm = match &config.llm.api_key {
        Some(key) => Some(Arc::new(GroqClient::new(&config.llm, key.clone())?)),
        None => {
            tracing::info!("No LLM API key configured; suggestions use the fixed fallback");
            None
        }
    };

    let state = AppState {
        cache,
        mapbox,
        waqi,
        llm,
    };

    web::run(state, config.server.port).await
}
