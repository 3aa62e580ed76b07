//! `prospector-auth`: authentication boundary.
//!
//! Credential verification, stateless session tokens and the request gate.
//! This crate is decoupled from HTTP and from any concrete store: storage is
//! reached through the [`CredentialStore`] port.

pub mod claims;
pub mod gate;
pub mod identity;
pub mod password;
pub mod session;
pub mod verifier;

pub use claims::{SessionClaims, TokenValidationError, validate_claims};
pub use gate::{CALLBACK_PARAM, GateDecision, PublicPaths, RequestGate, SIGN_IN_PATH, sign_in_redirect};
pub use identity::{CredentialStore, Identity, NewIdentity, PublicIdentity};
pub use password::{Argon2Hasher, HashCost, PasswordError, PasswordHasher};
pub use session::{Hs256SessionIssuer, IssuedSession, SessionError, SessionValidator};
pub use verifier::{AuthOutcome, IdentityVerifier, MIN_PASSWORD_LEN, Registration, RegistrationError};
