//! Stateless session tokens (HS256 JWT).
//!
//! Nothing is stored server-side: the token is the source of truth for the
//! session within its validity window.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::{PublicIdentity, SessionClaims, TokenValidationError, validate_claims};

/// Verifies a presented token and yields its claims.
///
/// Claims are only returned after both the signature and the time window
/// check out.
pub trait SessionValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenValidationError>;
}

impl<V> SessionValidator for Arc<V>
where
    V: SessionValidator + ?Sized,
{
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenValidationError> {
        (**self).validate(token, now)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("failed to encode session token: {0}")]
    Encode(String),
}

/// A freshly signed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedSession {
    pub token: String,
    pub claims: SessionClaims,
}

/// Issues and verifies HS256-signed session tokens with a server-held secret.
#[derive(Clone)]
pub struct Hs256SessionIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl core::fmt::Debug for Hs256SessionIssuer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256SessionIssuer")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl Hs256SessionIssuer {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        // Expiry is checked by `validate_claims` against an injected clock.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, identity: &PublicIdentity, now: DateTime<Utc>) -> Result<IssuedSession, SessionError> {
        let claims = SessionClaims {
            sub: identity.id,
            email: identity.email.clone(),
            name: identity.name.clone(),
            issued_at: now,
            expires_at: now + self.ttl,
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| SessionError::Encode(e.to_string()))?;

        Ok(IssuedSession { token, claims })
    }
}

impl SessionValidator for Hs256SessionIssuer {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenValidationError> {
        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenValidationError::BadSignature,
                _ => TokenValidationError::Malformed(e.to_string()),
            })?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}
