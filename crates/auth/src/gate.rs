//! Request gate: public/protected classification and session enforcement.
//!
//! The gate only answers "may this request reach a handler". Ownership of
//! individual resources is checked by the handlers themselves.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{SessionClaims, SessionValidator};

/// Where denied requests are sent.
pub const SIGN_IN_PATH: &str = "/signin";

/// Query parameter carrying the originally requested location.
pub const CALLBACK_PARAM: &str = "callbackUrl";

/// Paths that bypass session enforcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicPaths {
    exact: Vec<Cow<'static, str>>,
    prefixes: Vec<Cow<'static, str>>,
}

impl PublicPaths {
    pub fn empty() -> Self {
        Self {
            exact: Vec::new(),
            prefixes: Vec::new(),
        }
    }

    pub fn with_exact(mut self, path: impl Into<Cow<'static, str>>) -> Self {
        self.exact.push(path.into());
        self
    }

    /// Everything under `prefix` (which should end with `/`) is public.
    pub fn with_prefix(mut self, prefix: impl Into<Cow<'static, str>>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.exact.iter().any(|p| p == path) || self.prefixes.iter().any(|p| path.starts_with(p.as_ref()))
    }
}

impl Default for PublicPaths {
    /// Sign-in and registration, auth callbacks, inbound webhooks, static
    /// assets and the health probe.
    fn default() -> Self {
        Self::empty()
            .with_exact(SIGN_IN_PATH)
            .with_exact("/register")
            .with_exact("/api/register")
            .with_exact("/favicon.ico")
            .with_exact("/health")
            .with_prefix("/api/auth/")
            .with_prefix("/api/webhooks/")
            .with_prefix("/static/")
    }
}

/// Outcome of running a request through the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Public path: passes through without a session.
    Public,
    /// Protected path with a verified session.
    Authenticated(SessionClaims),
    /// Protected path without a usable session.
    Redirect { location: String },
}

/// Classifies requests and enforces session presence for protected paths.
#[derive(Debug, Clone)]
pub struct RequestGate<V> {
    public: PublicPaths,
    validator: V,
}

impl<V: SessionValidator> RequestGate<V> {
    pub fn new(public: PublicPaths, validator: V) -> Self {
        Self { public, validator }
    }

    /// `query` is the raw query string without the leading `?`.
    pub fn evaluate(
        &self,
        path: &str,
        query: Option<&str>,
        token: Option<&str>,
        now: DateTime<Utc>,
    ) -> GateDecision {
        if self.public.is_public(path) {
            return GateDecision::Public;
        }

        let Some(token) = token.filter(|t| !t.is_empty()) else {
            debug!(path, "no session presented; redirecting to sign-in");
            return GateDecision::Redirect {
                location: sign_in_redirect(path, query),
            };
        };

        match self.validator.validate(token, now) {
            Ok(claims) => GateDecision::Authenticated(claims),
            Err(e) => {
                debug!(path, reason = %e, "session rejected; redirecting to sign-in");
                GateDecision::Redirect {
                    location: sign_in_redirect(path, query),
                }
            }
        }
    }
}

/// Build `/signin?callbackUrl=<path[?query]>` with the callback percent-encoded.
pub fn sign_in_redirect(path: &str, query: Option<&str>) -> String {
    let original = match query.filter(|q| !q.is_empty()) {
        Some(q) => format!("{path}?{q}"),
        None => path.to_string(),
    };
    format!("{SIGN_IN_PATH}?{CALLBACK_PARAM}={}", urlencoding::encode(&original))
}
