use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::Response;
use chrono::{DateTime, Utc};

use prospector_auth::{PublicIdentity, SessionClaims};
use prospector_core::UserId;

use crate::app::errors::json_error;

/// Verified session for a request.
///
/// Inserted by the gate middleware; immutable for the life of the request.
/// Handlers that require a session extract it directly and get a 401 when it
/// is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    claims: SessionClaims,
}

impl SessionContext {
    pub fn new(claims: SessionClaims) -> Self {
        Self { claims }
    }

    pub fn user_id(&self) -> UserId {
        self.claims.sub
    }

    pub fn identity(&self) -> PublicIdentity {
        self.claims.identity()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.claims.expires_at
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionContext>()
            .cloned()
            .ok_or_else(|| json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "sign in required"))
    }
}
