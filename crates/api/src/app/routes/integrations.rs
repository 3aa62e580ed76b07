use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde_json::json;
use tracing::debug;

use prospector_infra::KeyVerifier;

use crate::app::{dto, errors, services::AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/mail/verify", post(verify_mail_key))
        .route("/ai/verify", post(verify_ai_key))
}

pub async fn verify_mail_key(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::VerifyKeyRequest>, JsonRejection>,
) -> axum::response::Response {
    verify_key(services.mail_keys.as_ref(), body).await
}

pub async fn verify_ai_key(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::VerifyKeyRequest>, JsonRejection>,
) -> axum::response::Response {
    verify_key(services.ai_keys.as_ref(), body).await
}

/// Every failure, including a malformed body, is reported as `invalid_key`.
async fn verify_key(
    verifier: &dyn KeyVerifier,
    body: Result<Json<dto::VerifyKeyRequest>, JsonRejection>,
) -> axum::response::Response {
    let api_key = match body {
        Ok(Json(b)) => b.api_key,
        Err(_) => String::new(),
    };

    match verifier.verify(&api_key).await {
        Ok(identity) => (
            StatusCode::OK,
            Json(json!({
                "valid": true,
                "provider": identity.provider,
                "account": identity.account,
            })),
        )
            .into_response(),
        Err(e) => {
            debug!(provider = verifier.provider().as_str(), reason = %e, "api key rejected");
            errors::json_error(StatusCode::UNAUTHORIZED, "invalid_key", "api key could not be verified")
        }
    }
}
