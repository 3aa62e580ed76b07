//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store selection and service construction
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use prospector_auth::{PublicPaths, RequestGate, SessionValidator};
use prospector_infra::AppConfig;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::{AppServices, ServiceError, Stores};

/// Build the full HTTP router from configuration (entrypoint used by `main.rs`).
pub async fn build_app(config: AppConfig) -> Result<Router, ServiceError> {
    let stores = services::build_stores(&config).await;
    let services = AppServices::new(config, stores)?;
    Ok(build_router(Arc::new(services)))
}

/// Router over already-built services. Every route, including the fallback,
/// sits behind the request gate.
pub fn build_router(services: Arc<AppServices>) -> Router {
    let sessions: Arc<dyn SessionValidator> = services.sessions.clone();
    let gate_state = middleware::GateState {
        gate: Arc::new(RequestGate::new(PublicPaths::default(), sessions.clone())),
        sessions,
    };

    routes::router().layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn_with_state(
                gate_state,
                middleware::gate_middleware,
            ))
            .layer(Extension(services)),
    )
}
