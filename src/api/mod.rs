// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    error::ProxyErrorBody,
    models::{ChallengeRequest, ChallengeResponse, MintRequest, MintResponse, WalletAddress},
    state::AppState,
};

pub mod health;
pub mod proxy;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/challenge", post(proxy::proxy_challenge))
        .route("/mint", post(proxy::proxy_mint))
        .with_state(state);

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors_layer()),
        )
}

/// Browser clients on any origin may call the relay.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
}

#[derive(OpenApi)]
#[openapi(
    paths(health::health, proxy::proxy_challenge, proxy::proxy_mint),
    components(
        schemas(
            WalletAddress,
            ChallengeRequest,
            ChallengeResponse,
            MintRequest,
            MintResponse,
            ProxyErrorBody,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Health", description = "Liveness probe"),
        (name = "Relay", description = "Pass-through to the minting API")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{relay::RelayForwarder, test_support::spawn_stub};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Json,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use url::Url;

    fn app(upstream: &str) -> Router {
        let forwarder = RelayForwarder::new(Url::parse(upstream).unwrap()).unwrap();
        router(AppState::new(forwarder))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_route_is_live() {
        let response = app("http://127.0.0.1:1")
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn challenge_route_relays_upstream_response() {
        let upstream = Router::new().route(
            "/challenge",
            axum::routing::post(|Json(body): Json<Value>| async move {
                let wallet = body["walletAddress"].as_str().unwrap_or("").to_string();
                Json(json!({
                    "success": true,
                    "challenge": "What is 6 * 7?",
                    "challengeId": format!("ch_for_{wallet}"),
                }))
            }),
        );
        let base = spawn_stub(upstream).await;

        let response = app(&base)
            .oneshot(post_json("/api/challenge", json!({"walletAddress": "0xABC"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"success": true, "challenge": "What is 6 * 7?", "challengeId": "ch_for_0xABC"})
        );
    }

    #[tokio::test]
    async fn mint_route_relays_upstream_response() {
        let upstream = Router::new().route(
            "/mint",
            axum::routing::post(|Json(body): Json<Value>| async move {
                let granted = body["challengeId"] == "ch_123" && body["answer"] == "42";
                let mint_type = if granted { "free" } else { "public" };
                (
                    StatusCode::ACCEPTED,
                    Json(json!({
                        "hex": "0xdead",
                        "ca": "0xC0FFEE",
                        "mintType": mint_type,
                        "value": 0.0005,
                    })),
                )
            }),
        );
        let base = spawn_stub(upstream).await;

        let response = app(&base)
            .oneshot(post_json(
                "/api/mint",
                json!({"walletAddress": "0xABC", "challengeId": "ch_123", "answer": "42"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(
            body_json(response).await,
            json!({"hex": "0xdead", "ca": "0xC0FFEE", "mintType": "free", "value": 0.0005})
        );
    }

    #[tokio::test]
    async fn mint_route_returns_envelope_when_upstream_down() {
        let response = app("http://127.0.0.1:1")
            .oneshot(post_json(
                "/api/mint",
                json!({"walletAddress": "0xABC", "challengeId": "ch_123", "answer": "42"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Proxy error");
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn malformed_body_gets_envelope_with_client_status() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/challenge")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app("http://127.0.0.1:1").oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Proxy error");
    }

    #[tokio::test]
    async fn preflight_allows_any_origin() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/challenge")
            .header("origin", "https://mint.example")
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "content-type")
            .body(Body::empty())
            .unwrap();

        let response = app("http://127.0.0.1:1").oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }
}
