use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use chrono::{Duration, Utc};

use prospector_auth::{GateDecision, RequestGate, SessionValidator};

use crate::context::SessionContext;

pub const SESSION_COOKIE: &str = "prospector_session";

#[derive(Clone)]
pub struct GateState {
    pub gate: Arc<RequestGate<Arc<dyn SessionValidator>>>,
    pub sessions: Arc<dyn SessionValidator>,
}

/// Runs every request through the [`RequestGate`].
///
/// Protected paths without a valid session are redirected to sign-in. A valid
/// session is attached as [`SessionContext`] on both protected and public
/// paths, so public handlers can still see who is calling. When both a cookie
/// and a bearer token are presented, the first one that validates is used.
pub async fn gate_middleware(
    State(state): State<GateState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let now = Utc::now();
    let presented = session_tokens(req.headers());
    let token = presented
        .iter()
        .find(|t| state.sessions.validate(t, now).is_ok())
        .or(presented.first())
        .map(|t| t.to_string());

    let decision = state.gate.evaluate(
        req.uri().path(),
        req.uri().query(),
        token.as_deref(),
        now,
    );

    match decision {
        GateDecision::Authenticated(claims) => {
            req.extensions_mut().insert(SessionContext::new(claims));
        }
        GateDecision::Public => {
            if let Some(claims) = token.and_then(|t| state.sessions.validate(&t, now).ok()) {
                req.extensions_mut().insert(SessionContext::new(claims));
            }
        }
        GateDecision::Redirect { location } => {
            return Redirect::to(&location).into_response();
        }
    }

    next.run(req).await
}

/// Session tokens presented on the request: the cookie first, then
/// `Authorization: Bearer`.
pub fn session_tokens(headers: &HeaderMap) -> Vec<&str> {
    cookie_value(headers, SESSION_COOKIE)
        .into_iter()
        .chain(extract_bearer(headers))
        .collect()
}

fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim())
        .filter(|v| !v.is_empty())
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let token = headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?
        .trim();
    (!token.is_empty()).then_some(token)
}

pub fn session_cookie(token: &str, ttl: Duration) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        ttl.num_seconds()
    ))
    .ok()
}

pub fn expired_session_cookie() -> HeaderValue {
    HeaderValue::from_static(
        "prospector_session=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
    )
}
