use serde::{Deserialize, Serialize};

use prospector_auth::{PublicIdentity, Registration};
use prospector_core::UserId;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl From<RegisterRequest> for Registration {
    fn from(req: RegisterRequest) -> Self {
        Registration {
            email: req.email,
            password: req.password,
            name: req.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyKeyRequest {
    pub api_key: String,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct RegisteredResponse {
    pub id: UserId,
    pub email: String,
}

impl From<PublicIdentity> for RegisteredResponse {
    fn from(identity: PublicIdentity) -> Self {
        Self {
            id: identity.id,
            email: identity.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SignedInResponse {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: Option<PublicIdentity>,
}
