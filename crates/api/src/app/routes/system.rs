use axum::{Json, http::StatusCode, response::IntoResponse};

use crate::app::errors;
use crate::context::SessionContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(session: SessionContext) -> impl IntoResponse {
    let identity = session.identity();
    Json(serde_json::json!({
        "id": identity.id.to_string(),
        "email": identity.email,
        "name": identity.name,
        "expires_at": session.expires_at(),
    }))
}

pub async fn not_found() -> axum::response::Response {
    errors::json_error(StatusCode::NOT_FOUND, "not_found", "not found")
}
