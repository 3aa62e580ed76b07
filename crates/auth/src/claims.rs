use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use prospector_core::UserId;

use crate::PublicIdentity;

/// Session token claims.
///
/// Field names on the wire follow JWT registered claim names; timestamps are
/// encoded as seconds since the epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: the authenticated identity.
    pub sub: UserId,

    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

impl SessionClaims {
    pub fn identity(&self) -> PublicIdentity {
        PublicIdentity {
            id: self.sub,
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

/// Why a presented token was rejected.
///
/// Callers must treat every variant identically ("unauthenticated"); the
/// distinction exists for logs and tests only.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,

    #[error("token signature does not verify")]
    BadSignature,

    #[error("malformed token: {0}")]
    Malformed(String),
}

/// Deterministically validate the time window of already-verified claims.
pub fn validate_claims(claims: &SessionClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}
