use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use prospector_prospects::NewTemplate;

use crate::app::{errors, services::AppServices};
use crate::context::SessionContext;

pub fn router() -> Router {
    Router::new().route("/", post(create_template).get(list_templates))
}

pub async fn create_template(
    Extension(services): Extension<Arc<AppServices>>,
    session: SessionContext,
    body: Result<Json<NewTemplate>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match services.create_template(session.user_id(), body).await {
        Ok(template) => (StatusCode::CREATED, Json(template)).into_response(),
        Err(e) => errors::write_error_to_response("templates.create", e),
    }
}

/// No synthetic fallback: a store failure is a 500.
pub async fn list_templates(
    Extension(services): Extension<Arc<AppServices>>,
    session: SessionContext,
) -> axum::response::Response {
    match services.list_templates(session.user_id()).await {
        Ok(items) => (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response(),
        Err(e) => errors::store_error_to_response("templates.list", e),
    }
}
