//! Identity verification and registration.

use std::sync::Arc;

use prospector_core::{StoreError, UserId};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{CredentialStore, NewIdentity, PasswordError, PasswordHasher, PublicIdentity};

/// Shortest password accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Result of an authentication attempt.
///
/// Unknown email, wrong password and store failure all produce `Denied`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Authenticated(PublicIdentity),
    Denied,
}

/// Registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("an account with this email already exists")]
    Conflict,

    #[error(transparent)]
    Store(StoreError),

    #[error(transparent)]
    Hashing(#[from] PasswordError),
}

/// Verifies email/password pairs and registers new identities.
///
/// Argon2 work runs on the blocking pool so it never stalls the async runtime.
pub struct IdentityVerifier<S, H: ?Sized> {
    store: S,
    hasher: Arc<H>,
    /// Verified against when the email is unknown, so both denial paths cost a
    /// full hash verification.
    decoy_hash: String,
}

impl<S, H> IdentityVerifier<S, H>
where
    S: CredentialStore,
    H: PasswordHasher + ?Sized + 'static,
{
    pub fn new(store: S, hasher: Arc<H>) -> Result<Self, PasswordError> {
        let decoy_hash = hasher.hash(&UserId::new().to_string())?;
        Ok(Self {
            store,
            hasher,
            decoy_hash,
        })
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> AuthOutcome {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return AuthOutcome::Denied;
        }

        let identity = match self.store.find_by_email(email).await {
            Ok(Some(identity)) => identity,
            Ok(None) => {
                let _ = self.verify_blocking(password, &self.decoy_hash).await;
                debug!("authentication denied");
                return AuthOutcome::Denied;
            }
            Err(e) => {
                let _ = self.verify_blocking(password, &self.decoy_hash).await;
                warn!(error = %e, "credential lookup failed; authentication denied");
                return AuthOutcome::Denied;
            }
        };

        if self.verify_blocking(password, &identity.password_hash).await {
            debug!(user_id = %identity.id, "authentication succeeded");
            AuthOutcome::Authenticated(identity.to_public())
        } else {
            debug!("authentication denied");
            AuthOutcome::Denied
        }
    }

    pub async fn register(&self, registration: Registration) -> Result<PublicIdentity, RegistrationError> {
        let Registration { email, password, name } = registration;
        let email = email.trim().to_string();

        if email.is_empty() {
            return Err(RegistrationError::Validation("email is required".to_string()));
        }
        if !email.contains('@') {
            return Err(RegistrationError::Validation("invalid email format".to_string()));
        }
        if password.is_empty() {
            return Err(RegistrationError::Validation("password is required".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(RegistrationError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        match self.store.find_by_email(&email).await {
            Ok(Some(_)) => return Err(RegistrationError::Conflict),
            Ok(None) => {}
            Err(e) => return Err(RegistrationError::Store(e)),
        }

        let password_hash = self.hash_blocking(password).await?;
        let name = name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());

        // The lookup above is advisory; a concurrent registration loses on the
        // store's unique constraint instead.
        let created = self
            .store
            .create(NewIdentity {
                email,
                name,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => RegistrationError::Conflict,
                other => RegistrationError::Store(other),
            })?;

        debug!(user_id = %created.id, "identity registered");
        Ok(created.to_public())
    }

    async fn hash_blocking(&self, password: String) -> Result<String, PasswordError> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| PasswordError::Hash(format!("hash task failed: {e}")))?
    }

    /// A failed verification task counts as a mismatch.
    async fn verify_blocking(&self, password: &str, hash: &str) -> bool {
        let hasher = Arc::clone(&self.hasher);
        let (password, hash) = (password.to_string(), hash.to_string());
        match tokio::task::spawn_blocking(move || hasher.verify(&password, &hash)).await {
            Ok(matched) => matched,
            Err(e) => {
                warn!(error = %e, "password verification task failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::{Duration, Instant};

    use async_trait::async_trait;
    use prospector_core::StoreResult;

    use super::*;
    use crate::{Argon2Hasher, HashCost, Identity};

    #[derive(Default)]
    struct FakeStore {
        rows: Mutex<HashMap<String, Identity>>,
        down: AtomicBool,
    }

    #[async_trait]
    impl CredentialStore for FakeStore {
        async fn find_by_email(&self, email: &str) -> StoreResult<Option<Identity>> {
            if self.down.load(Ordering::SeqCst) {
                return Err(StoreError::unavailable("down"));
            }
            Ok(self.rows.lock().unwrap().get(email).cloned())
        }

        async fn create(&self, identity: NewIdentity) -> StoreResult<Identity> {
            if self.down.load(Ordering::SeqCst) {
                return Err(StoreError::unavailable("down"));
            }
            let mut rows = self.rows.lock().unwrap();
            if rows.contains_key(&identity.email) {
                return Err(StoreError::conflict("email"));
            }
            let row = Identity {
                id: UserId::new(),
                email: identity.email,
                name: identity.name,
                password_hash: identity.password_hash,
            };
            rows.insert(row.email.clone(), row.clone());
            Ok(row)
        }
    }

    fn cheap_hasher() -> Arc<Argon2Hasher> {
        Arc::new(Argon2Hasher::new(HashCost::new(1_024, 1, 1)).unwrap())
    }

    fn verifier() -> IdentityVerifier<Arc<FakeStore>, Argon2Hasher> {
        IdentityVerifier::new(Arc::new(FakeStore::default()), cheap_hasher()).unwrap()
    }

    fn reg(email: &str, password: &str) -> Registration {
        Registration {
            email: email.to_string(),
            password: password.to_string(),
            name: None,
        }
    }

    #[tokio::test]
    async fn register_then_authenticate() {
        let v = verifier();
        let created = v.register(reg("a@b.com", "longenough1")).await.unwrap();
        assert_eq!(created.email, "a@b.com");

        let outcome = v.authenticate("a@b.com", "longenough1").await;
        assert_eq!(outcome, AuthOutcome::Authenticated(created));
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let v = verifier();
        v.register(reg("a@b.com", "longenough1")).await.unwrap();
        assert_eq!(
            v.register(reg("a@b.com", "different-pass")).await,
            Err(RegistrationError::Conflict)
        );
    }

    #[tokio::test]
    async fn email_is_case_sensitive_as_stored() {
        let v = verifier();
        v.register(reg("a@b.com", "longenough1")).await.unwrap();
        assert_eq!(v.authenticate("A@B.com", "longenough1").await, AuthOutcome::Denied);
    }

    #[tokio::test]
    async fn validation_failures() {
        let v = verifier();
        for (email, password) in [("", "longenough1"), ("a@b.com", ""), ("a@b.com", "short7c"), ("nope", "longenough1")] {
            assert!(
                matches!(v.register(reg(email, password)).await, Err(RegistrationError::Validation(_))),
                "expected validation error for {email:?}/{password:?}"
            );
        }
    }

    #[tokio::test]
    async fn exactly_min_length_is_accepted() {
        let v = verifier();
        assert!(v.register(reg("a@b.com", "12345678")).await.is_ok());
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_indistinguishable() {
        let v = verifier();
        v.register(reg("a@b.com", "longenough1")).await.unwrap();

        let wrong = v.authenticate("a@b.com", "wrong-password").await;
        let unknown = v.authenticate("nobody@b.com", "longenough1").await;
        assert_eq!(wrong, AuthOutcome::Denied);
        assert_eq!(unknown, wrong);
    }

    #[tokio::test]
    async fn store_outage_denies_authentication_and_fails_registration() {
        let store = Arc::new(FakeStore::default());
        let v = IdentityVerifier::new(store.clone(), cheap_hasher()).unwrap();
        v.register(reg("a@b.com", "longenough1")).await.unwrap();

        store.down.store(true, Ordering::SeqCst);

        assert_eq!(v.authenticate("a@b.com", "longenough1").await, AuthOutcome::Denied);
        assert!(matches!(
            v.register(reg("c@d.com", "longenough1")).await,
            Err(RegistrationError::Store(StoreError::Unavailable(_)))
        ));
    }

    struct SlowHasher;

    impl PasswordHasher for SlowHasher {
        fn hash(&self, password: &str) -> Result<String, PasswordError> {
            std::thread::sleep(Duration::from_millis(300));
            Ok(format!("slow:{password}"))
        }

        fn verify(&self, password: &str, hash: &str) -> bool {
            std::thread::sleep(Duration::from_millis(300));
            hash == format!("slow:{password}")
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn hashing_does_not_stall_the_runtime() {
        let v = IdentityVerifier::new(Arc::new(FakeStore::default()), Arc::new(SlowHasher)).unwrap();
        let start = Instant::now();

        let (auth_done, tick_done) = tokio::join!(
            async {
                assert_eq!(v.authenticate("nobody@b.com", "longenough1").await, AuthOutcome::Denied);
                Instant::now()
            },
            async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                Instant::now()
            }
        );

        assert!(tick_done < auth_done, "timer waited for the password hash");
        assert!(tick_done - start < Duration::from_millis(200));
    }

    #[tokio::test]
    async fn blank_name_is_dropped() {
        let v = verifier();
        let created = v
            .register(Registration {
                name: Some("   ".to_string()),
                ..reg("a@b.com", "longenough1")
            })
            .await
            .unwrap();
        assert_eq!(created.name, None);
    }
}
