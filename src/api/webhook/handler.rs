// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Webhook endpoint handler

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tracing::error;

use super::request::TwilioWebhookRequest;
use super::response::MessagingResponse;
use crate::api::http_server::AppState;
use crate::reply::composer::{compose, ReplyContext};

/// POST /webhook - Handle an incoming message
///
/// Always answers `200 OK` with a TwiML document containing exactly one
/// reply, even when the payload cannot be parsed: Twilio surfaces non-2xx
/// webhook responses as delivery failures, so parse errors map to the
/// generic failure reply instead.
pub async fn webhook_handler(
    State(state): State<AppState>,
    form: Result<Form<TwilioWebhookRequest>, FormRejection>,
) -> Response {
    let reply = match form {
        Ok(Form(request)) => {
            let turn = request.into_turn();
            state.dispatcher.handle_turn(&turn).await
        }
        Err(rejection) => {
            error!(error = %rejection, "failed to parse webhook payload");
            compose(ReplyContext::InternalError)
        }
    };

    let twiml = MessagingResponse::new().message(&reply).to_xml();
    (
        [(header::CONTENT_TYPE, "application/xml")],
        twiml,
    )
        .into_response()
}
