use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};
use subtle::ConstantTimeEq;
use tracing::info;

use crate::app::{errors, services::AppServices};

pub const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

pub fn router() -> Router {
    Router::new().route("/inbound", post(inbound))
}

/// Accepts any JSON payload and records its `type`. When a shared secret is
/// configured, the request must carry it.
pub async fn inbound(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> axum::response::Response {
    if let Some(expected) = services.config.webhook_secret.as_deref() {
        let presented = headers.get(WEBHOOK_SECRET_HEADER).map(|v| v.as_bytes());
        if !secret_matches(presented, expected) {
            return errors::json_error(StatusCode::UNAUTHORIZED, "invalid_signature", "webhook secret mismatch");
        }
    }

    let Json(payload) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    let event_type = payload
        .get("type")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown");
    info!(event_type, "inbound webhook received");

    StatusCode::ACCEPTED.into_response()
}

/// Compares in constant time for equal-length inputs.
fn secret_matches(presented: Option<&[u8]>, expected: &str) -> bool {
    presented.is_some_and(|p| bool::from(p.ct_eq(expected.as_bytes())))
}
