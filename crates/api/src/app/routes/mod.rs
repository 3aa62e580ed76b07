use axum::{
    Router,
    routing::{get, post},
};

pub mod auth;
pub mod integrations;
pub mod prospects;
pub mod system;
pub mod templates;
pub mod webhooks;

/// Router for every endpoint. Access control is applied by the gate layer in
/// `build_router`, not per route.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/api/register", post(auth::register))
        .nest("/api/auth", auth::router())
        .route("/api/me", get(system::whoami))
        .nest("/api/prospects", prospects::router())
        .nest("/api/templates", templates::router())
        .nest("/api/integrations", integrations::router())
        .nest("/api/webhooks", webhooks::router())
        .fallback(system::not_found)
}
