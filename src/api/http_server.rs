// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP server wiring for the webhook and status endpoints

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::api::webhook::webhook_handler;
use crate::dispatch::TurnDispatcher;

/// Shared request state
///
/// The dispatcher (and the detector handle inside it) is initialized once
/// in `main` and only ever read afterwards.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<TurnDispatcher>,
    pub model_path: String,
}

/// GET / response payload
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub model_loaded: bool,
}

/// GET /status response payload
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub model_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_path: Option<String>,
    pub timestamp: i64,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/", get(health_handler))
        // Message webhook
        .route("/webhook", post(webhook_handler))
        // Status endpoint for monitoring
        .route("/status", get(status_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until shutdown
pub async fn start_server(state: AppState, port: u16) -> Result<()> {
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("webhook server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "online",
        service: "WhatsApp Pest Detection Bot",
        model_loaded: state.dispatcher.model_loaded(),
    })
}

async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let model_loaded = state.dispatcher.model_loaded();
    Json(StatusResponse {
        status: "online",
        model_loaded,
        model_path: model_loaded.then(|| state.model_path.clone()),
        timestamp: Utc::now().timestamp(),
    })
}
