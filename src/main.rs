// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::{env, sync::Arc};

use anyhow::Result;
use fabstir_pest_node::{
    api::{start_server, AppState},
    config::AppConfig,
    detection::{ObjectDetector, YoloPestModel},
    dispatch::TurnDispatcher,
    media::MediaFetcher,
    version,
};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    println!("🚀 Starting Fabstir Pest Node...\n");
    println!("📦 BUILD VERSION: {}", version::VERSION);
    println!("📅 Build Date: {}", version::BUILD_DATE);
    println!();

    let config = AppConfig::from_env();

    if config.media_credentials.is_none() {
        warn!(
            "TWILIO_ACCOUNT_SID / TWILIO_AUTH_TOKEN not set; media download will be unauthenticated"
        );
    }

    // Load the detection model once; all turns share the handle read-only.
    // A load failure is not fatal: the bot stays up and answers image turns
    // with the "service not configured" reply.
    info!("Loading pest detection model from {}...", config.model_path);
    let detector: Option<Arc<dyn ObjectDetector>> = match YoloPestModel::load(&config.model_path) {
        Ok(model) => {
            info!("✅ Model loaded successfully!");
            Some(Arc::new(model))
        }
        Err(e) => {
            error!("Error loading model: {:#}", e);
            None
        }
    };

    let fetcher = MediaFetcher::new(config.media_credentials.clone())?;
    let dispatcher = TurnDispatcher::new(detector, fetcher, config.confidence_threshold);

    let state = AppState {
        dispatcher: Arc::new(dispatcher),
        model_path: config.model_path.clone(),
    };

    start_server(state, config.port).await
}
