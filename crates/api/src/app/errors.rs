use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use tracing::error;

use prospector_auth::RegistrationError;
use prospector_core::{DomainError, StoreError};

use crate::app::services::WriteError;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::Unauthenticated => json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "sign in required"),
        DomainError::Forbidden => json_error(StatusCode::FORBIDDEN, "forbidden", "forbidden"),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
    }
}

/// Generic 500. The store's own message goes to the log only.
pub fn store_error_to_response(operation: &'static str, err: StoreError) -> axum::response::Response {
    error!(operation, error = %err, "store failure on write path");
    internal_error()
}

pub fn write_error_to_response(operation: &'static str, err: WriteError) -> axum::response::Response {
    match err {
        WriteError::Domain(e) => domain_error_to_response(e),
        WriteError::Store(e) => store_error_to_response(operation, e),
    }
}

pub fn registration_error_to_response(err: RegistrationError) -> axum::response::Response {
    match err {
        RegistrationError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        RegistrationError::Conflict => json_error(
            StatusCode::CONFLICT,
            "conflict",
            "an account with this email already exists",
        ),
        RegistrationError::Store(e) => store_error_to_response("register", e),
        RegistrationError::Hashing(e) => {
            error!(error = %e, "password hashing failed");
            internal_error()
        }
    }
}

/// Malformed or mistyped JSON bodies are validation failures.
pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "validation_error", rejection.body_text())
}

pub fn internal_error() -> axum::response::Response {
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal server error")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_stable_statuses() {
        let cases = [
            (DomainError::validation("x"), StatusCode::BAD_REQUEST),
            (DomainError::conflict("x"), StatusCode::CONFLICT),
            (DomainError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (DomainError::Forbidden, StatusCode::FORBIDDEN),
            (DomainError::NotFound, StatusCode::NOT_FOUND),
        ];
        for (err, status) in cases {
            assert_eq!(domain_error_to_response(err).status(), status);
        }
    }

    #[test]
    fn store_failures_are_generic_500s() {
        let resp = write_error_to_response("op", StoreError::unavailable("db host 10.0.0.5 refused").into());
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
