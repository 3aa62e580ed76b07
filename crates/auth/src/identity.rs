//! Identities and the credential storage port.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use prospector_core::{Entity, StoreResult, UserId};

/// A registered identity, including its password hash.
///
/// Never serialized: use [`PublicIdentity`] at any boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    /// Unique; compared exactly as stored.
    pub email: String,
    pub name: Option<String>,
    pub password_hash: String,
}

impl Identity {
    pub fn to_public(&self) -> PublicIdentity {
        PublicIdentity {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

impl Entity for Identity {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// The minimal identity handed out after successful authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicIdentity {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
}

/// Insert payload for a new identity. The password is already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIdentity {
    pub email: String,
    pub name: Option<String>,
    pub password_hash: String,
}

/// Credential storage port.
///
/// `Ok(None)` means "no such identity". Every `Err` is a data-path failure and
/// must stay distinguishable from absence at the call site.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Identity>>;

    /// Persist a new identity. Email uniqueness is enforced by the store and
    /// reported as `StoreError::Conflict`.
    async fn create(&self, identity: NewIdentity) -> StoreResult<Identity>;
}

#[async_trait]
impl<S> CredentialStore for Arc<S>
where
    S: CredentialStore + ?Sized,
{
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Identity>> {
        (**self).find_by_email(email).await
    }

    async fn create(&self, identity: NewIdentity) -> StoreResult<Identity> {
        (**self).create(identity).await
    }
}
