// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// Label carried by every relay failure body.
pub const PROXY_ERROR_LABEL: &str = "Proxy error";

/// Relay failure rendered as the uniform JSON envelope.
#[derive(Debug)]
pub struct ProxyError {
    pub status: StatusCode,
    pub message: String,
}

/// `{"success": false, "error": "Proxy error", "message": ...}`
#[derive(Debug, Serialize, ToSchema)]
pub struct ProxyErrorBody {
    pub success: bool,
    pub error: String,
    pub message: String,
}

impl ProxyError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Upstream or transport failure; always reported as 500.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Upstream answered outside 2xx.
    pub fn upstream_status(status: u16) -> Self {
        Self::internal(format!("Request failed with status code {status}"))
    }
}

impl std::fmt::Display for ProxyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = Json(ProxyErrorBody {
            success: false,
            error: PROXY_ERROR_LABEL.to_string(),
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn constructors_set_status_and_message() {
        let internal = ProxyError::internal("timeout of 10000ms exceeded");
        assert_eq!(internal.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(internal.message, "timeout of 10000ms exceeded");

        let upstream = ProxyError::upstream_status(404);
        assert_eq!(upstream.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(upstream.message, "Request failed with status code 404");
    }

    #[tokio::test]
    async fn into_response_returns_envelope() {
        let response = ProxyError::internal("connection refused").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(
            body,
            r#"{"success":false,"error":"Proxy error","message":"connection refused"}"#
        );
    }
}
