// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP client for the challenge and mint endpoints, either through the relay
//! or directly against the upstream API.

use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use crate::{
    config::{endpoint, ClientConfig, REQUEST_TIMEOUT},
    models::{ChallengeRequest, ChallengeResponse, MintRequest, MintResponse},
};

use super::error::ApiFailure;

/// Which base URL a request is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `{relay}/api/...`
    Relay,
    /// `{upstream}/...`
    Direct,
}

impl Route {
    fn label(self) -> &'static str {
        match self {
            Route::Relay => "Relay",
            Route::Direct => "API",
        }
    }
}

#[derive(Debug, Clone)]
pub struct MintApiClient {
    http: Client,
    relay_base: Url,
    upstream_base: Url,
    use_relay: bool,
}

impl MintApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            relay_base: config.relay_base.clone(),
            upstream_base: config.upstream_base.clone(),
            use_relay: config.use_relay,
        })
    }

    pub fn uses_relay(&self) -> bool {
        self.use_relay
    }

    /// Route for calls that have no fallback.
    pub fn default_route(&self) -> Route {
        if self.use_relay {
            Route::Relay
        } else {
            Route::Direct
        }
    }

    pub async fn challenge(
        &self,
        route: Route,
        request: &ChallengeRequest,
    ) -> Result<ChallengeResponse, ApiFailure> {
        self.post_json(route, "challenge", request).await
    }

    /// Submit an answer through the configured base.
    pub async fn mint(&self, request: &MintRequest) -> Result<MintResponse, ApiFailure> {
        self.post_json(self.default_route(), "mint", request).await
    }

    fn url(&self, route: Route, path: &str) -> String {
        match route {
            Route::Relay => endpoint(&self.relay_base, &format!("api/{path}")),
            Route::Direct => endpoint(&self.upstream_base, path),
        }
    }

    async fn post_json<B, T>(&self, route: Route, path: &str, body: &B) -> Result<T, ApiFailure>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(route, path);

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ApiFailure::Network(format!(
                        "timeout of {}ms exceeded",
                        REQUEST_TIMEOUT.as_millis()
                    ))
                } else {
                    ApiFailure::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiFailure::Upstream(format!(
                "{} error: {}",
                route.label(),
                status.as_u16()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiFailure::Upstream(format!("Invalid {} response: {e}", route.label())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_stub;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    fn client(relay: &str, upstream: &str, use_relay: bool) -> MintApiClient {
        let config = ClientConfig {
            relay_base: Url::parse(relay).unwrap(),
            upstream_base: Url::parse(upstream).unwrap(),
            use_relay,
            ..ClientConfig::from_lookup(|_| None).unwrap()
        };
        MintApiClient::new(&config).unwrap()
    }

    fn request() -> ChallengeRequest {
        ChallengeRequest {
            wallet_address: "0xABC".into(),
        }
    }

    #[tokio::test]
    async fn relay_route_prefixes_api() {
        let stub = Router::new().route(
            "/api/challenge",
            post(|Json(body): Json<Value>| async move {
                Json(json!({
                    "success": true,
                    "challenge": "2 + 2",
                    "challengeId": format!("ch_{}", body["walletAddress"].as_str().unwrap_or("")),
                }))
            }),
        );
        let base = spawn_stub(stub).await;

        let response = client(&base, "http://127.0.0.1:1", true)
            .challenge(Route::Relay, &request())
            .await
            .unwrap();
        assert!(response.success);
        assert_eq!(response.challenge_id, "ch_0xABC");
    }

    #[tokio::test]
    async fn non_success_status_is_upstream_failure() {
        let stub = Router::new().route(
            "/challenge",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
        );
        let base = spawn_stub(stub).await;

        let err = client("http://127.0.0.1:1", &base, true)
            .challenge(Route::Direct, &request())
            .await
            .unwrap_err();
        assert_eq!(err, ApiFailure::Upstream("API error: 503".into()));
    }

    #[tokio::test]
    async fn unreachable_host_is_network_failure() {
        let err = client("http://127.0.0.1:1", "http://127.0.0.1:1", true)
            .challenge(Route::Relay, &request())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiFailure::Network(_)));
    }

    #[tokio::test]
    async fn mint_goes_to_upstream_without_relay() {
        let stub = Router::new().route(
            "/mint",
            post(|| async { Json(json!({"hex": "0xdead", "ca": "0xC0FFEE", "value": 0.001})) }),
        );
        let base = spawn_stub(stub).await;

        let response = client("http://127.0.0.1:1", &base, false)
            .mint(&MintRequest {
                wallet_address: "0xABC".into(),
                challenge_id: "ch_1".into(),
                answer: "4".into(),
            })
            .await
            .unwrap();
        assert_eq!(response.hex.as_deref(), Some("0xdead"));
        assert_eq!(response.value.as_deref(), Some("0.001"));
    }
}
