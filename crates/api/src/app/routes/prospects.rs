use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use prospector_prospects::{NewActivity, NewProspect, ProspectRecord, ResolvedProspect};

use crate::app::{errors, services::AppServices};
use crate::context::SessionContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_prospect))
        .route("/:id", get(get_prospect))
        .route("/:id/activities", post(log_activity))
}

pub async fn create_prospect(
    Extension(services): Extension<Arc<AppServices>>,
    session: SessionContext,
    body: Result<Json<NewProspect>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match services.create_prospect(session.user_id(), body).await {
        Ok(prospect) => (
            StatusCode::CREATED,
            Json(ResolvedProspect::Real(ProspectRecord::from(prospect))),
        )
            .into_response(),
        Err(e) => errors::write_error_to_response("prospects.create", e),
    }
}

/// Reads never fail on store outages: the resolver serves a synthetic record
/// instead.
pub async fn get_prospect(
    Extension(services): Extension<Arc<AppServices>>,
    session: Option<SessionContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services
        .resolver
        .resolve(session.map(|s| s.user_id()), &id)
        .await
    {
        Ok(resolved) => (StatusCode::OK, Json(resolved)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn log_activity(
    Extension(services): Extension<Arc<AppServices>>,
    session: SessionContext,
    Path(id): Path<String>,
    body: Result<Json<NewActivity>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match services.log_activity(session.user_id(), &id, body).await {
        Ok(activity) => (StatusCode::CREATED, Json(activity)).into_response(),
        Err(e) => errors::write_error_to_response("prospects.log_activity", e),
    }
}
