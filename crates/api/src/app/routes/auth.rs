//! Registration and session lifecycle.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use tracing::{error, info};

use prospector_auth::AuthOutcome;

use crate::app::{dto, errors, services::AppServices};
use crate::context::SessionContext;
use crate::middleware::{expired_session_cookie, session_cookie};

pub fn router() -> Router {
    Router::new()
        .route("/signin", post(sign_in))
        .route("/signout", post(sign_out))
        .route("/session", get(session))
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::RegisterRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match services.verifier.register(body.into()).await {
        Ok(identity) => {
            info!(user_id = %identity.id, "identity registered");
            (StatusCode::CREATED, Json(dto::RegisteredResponse::from(identity))).into_response()
        }
        Err(e) => errors::registration_error_to_response(e),
    }
}

pub async fn sign_in(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::SignInRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    let identity = match services.verifier.authenticate(&body.email, &body.password).await {
        AuthOutcome::Authenticated(identity) => identity,
        AuthOutcome::Denied => {
            return errors::json_error(
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "invalid email or password",
            );
        }
    };

    let issued = match services.sessions.issue(&identity, Utc::now()) {
        Ok(issued) => issued,
        Err(e) => {
            error!(error = %e, "failed to issue session");
            return errors::internal_error();
        }
    };

    let Some(cookie) = session_cookie(&issued.token, services.sessions.ttl()) else {
        error!("session token is not a valid header value");
        return errors::internal_error();
    };

    info!(user_id = %identity.id, "session issued");
    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(dto::SignedInResponse {
            id: identity.id,
            email: identity.email,
            name: identity.name,
            token: issued.token,
        }),
    )
        .into_response()
}

/// Sessions are stateless; signing out only clears the cookie.
pub async fn sign_out() -> axum::response::Response {
    (StatusCode::NO_CONTENT, [(header::SET_COOKIE, expired_session_cookie())]).into_response()
}

pub async fn session(session: Option<SessionContext>) -> impl IntoResponse {
    Json(dto::SessionResponse {
        user: session.map(|s| s.identity()),
    })
}
