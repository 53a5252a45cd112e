// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relay endpoints forwarding to the upstream minting API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    error::{ProxyError, ProxyErrorBody},
    models::{ChallengeRequest, ChallengeResponse, MintRequest, MintResponse},
    relay::Forwarded,
    state::AppState,
};

fn accept_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ProxyError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ProxyError::new(rejection.status(), rejection.body_text()))
}

/// Forward a challenge request.
#[utoipa::path(
    post,
    path = "/api/challenge",
    tag = "Relay",
    request_body = ChallengeRequest,
    responses(
        (status = 200, description = "Upstream response, verbatim", body = ChallengeResponse),
        (status = 500, description = "Upstream unreachable or failed", body = ProxyErrorBody)
    )
)]
pub async fn proxy_challenge(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Forwarded, ProxyError> {
    let body = accept_body(body)?;
    info!(body = %body, "Proxying challenge request");

    state
        .forwarder
        .forward_challenge(&body)
        .await
        .inspect_err(|e| warn!(error = %e, "Challenge proxy error"))
}

/// Forward a mint request. Only the wallet address and challenge id are
/// logged; the answer never is.
#[utoipa::path(
    post,
    path = "/api/mint",
    tag = "Relay",
    request_body = MintRequest,
    responses(
        (status = 200, description = "Upstream response, verbatim", body = MintResponse),
        (status = 500, description = "Upstream unreachable or failed", body = ProxyErrorBody)
    )
)]
pub async fn proxy_mint(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Forwarded, ProxyError> {
    let body = accept_body(body)?;
    let wallet_address = body.get("walletAddress").and_then(Value::as_str);
    let challenge_id = body.get("challengeId").and_then(Value::as_str);
    info!(wallet_address, challenge_id, "Proxying mint request");

    state
        .forwarder
        .forward_mint(&body)
        .await
        .inspect_err(|e| warn!(error = %e, "Mint proxy error"))
}
