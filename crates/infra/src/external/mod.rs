//! Outbound adapters for third-party providers.

pub mod key_check;

pub use key_check::{HttpKeyVerifier, KeyCheckError, KeyIdentity, KeyVerifier, Provider};
