// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod http_server;
pub mod webhook;

pub use http_server::{router, start_server, AppState, HealthResponse, StatusResponse};
pub use webhook::{webhook_handler, MessagingResponse, TwilioWebhookRequest};
