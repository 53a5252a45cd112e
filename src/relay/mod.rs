// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Relay Forwarder
//!
//! Stateless pass-through to the upstream minting API. Bodies are forwarded
//! unmodified and upstream 2xx responses are returned verbatim (status and
//! JSON body). Everything else collapses into [`ProxyError`].
//!
//! The forwarder holds only a `reqwest::Client`, which is cheap to clone and
//! safe to share across concurrent requests.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::{
    config::{endpoint, REQUEST_TIMEOUT},
    error::ProxyError,
};

pub const CHALLENGE_PATH: &str = "challenge";
pub const MINT_PATH: &str = "mint";

/// Upstream response passed back to the caller unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Forwarded {
    pub status: StatusCode,
    pub body: Value,
}

impl IntoResponse for Forwarded {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[derive(Debug, Clone)]
pub struct RelayForwarder {
    upstream_base: Url,
    http: Client,
}

impl RelayForwarder {
    pub fn new(upstream_base: Url) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            upstream_base,
            http,
        })
    }

    /// Forward a challenge request to `{upstream}/challenge`.
    pub async fn forward_challenge(&self, body: &Value) -> Result<Forwarded, ProxyError> {
        self.forward(CHALLENGE_PATH, body).await
    }

    /// Forward a mint request to `{upstream}/mint`.
    pub async fn forward_mint(&self, body: &Value) -> Result<Forwarded, ProxyError> {
        self.forward(MINT_PATH, body).await
    }

    async fn forward(&self, path: &str, body: &Value) -> Result<Forwarded, ProxyError> {
        let url = endpoint(&self.upstream_base, path);

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ProxyError::internal(describe_transport_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProxyError::upstream_status(status.as_u16()));
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| ProxyError::internal(format!("Invalid upstream JSON: {e}")))?;

        Ok(Forwarded {
            status: StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::OK),
            body,
        })
    }
}

fn describe_transport_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("timeout of {}ms exceeded", REQUEST_TIMEOUT.as_millis())
    } else {
        error.to_string()
    }
}
