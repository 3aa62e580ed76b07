//! Service wiring: stores, authentication, the prospect resolver and the
//! provider key checks, built once per process and shared by every handler.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};

use prospector_auth::{
    Argon2Hasher, CredentialStore, Hs256SessionIssuer, IdentityVerifier, PasswordError, PasswordHasher,
};
use prospector_core::{
    ActivityId, DomainError, Owned, ProspectId, StoreError, TemplateId, UserId,
};
use prospector_infra::{
    AppConfig, HttpKeyVerifier, InMemoryStore, KeyCheckError, KeyVerifier, PostgresStore, ProspectResolver,
    ProspectStore, StoreBackend, StoreContext, TemplateStore, store,
};
use prospector_prospects::{Activity, NewActivity, NewProspect, NewTemplate, Prospect, Template};

pub type SharedVerifier = IdentityVerifier<Arc<dyn CredentialStore>, dyn PasswordHasher>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("password hasher: {0}")]
    Hashing(#[from] PasswordError),

    #[error("provider client: {0}")]
    KeyCheck(#[from] KeyCheckError),
}

/// Failure of a write path. Store failures are never retried and never
/// fall back.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One handle per persistence trait. All three usually point at the same
/// adapter.
#[derive(Clone)]
pub struct Stores {
    pub identities: Arc<dyn CredentialStore>,
    pub prospects: Arc<dyn ProspectStore>,
    pub templates: Arc<dyn TemplateStore>,
}

impl Stores {
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: CredentialStore + ProspectStore + TemplateStore + 'static,
    {
        Self {
            identities: store.clone(),
            prospects: store.clone(),
            templates: store,
        }
    }
}

pub struct AppServices {
    pub config: AppConfig,
    pub stores: Stores,
    pub verifier: SharedVerifier,
    pub sessions: Arc<Hs256SessionIssuer>,
    pub resolver: ProspectResolver<Arc<dyn ProspectStore>>,
    pub mail_keys: Arc<dyn KeyVerifier>,
    pub ai_keys: Arc<dyn KeyVerifier>,
}

impl AppServices {
    pub fn new(config: AppConfig, stores: Stores) -> Result<Self, ServiceError> {
        let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2Hasher::new(config.hash_cost)?);
        let verifier = IdentityVerifier::new(stores.identities.clone(), hasher)?;
        let sessions = Arc::new(Hs256SessionIssuer::new(
            config.session_secret.as_bytes(),
            config.session_ttl,
        ));
        let resolver = ProspectResolver::new(stores.prospects.clone());
        let mail_keys: Arc<dyn KeyVerifier> =
            Arc::new(HttpKeyVerifier::mail(config.mail_provider_base_url.clone())?);
        let ai_keys: Arc<dyn KeyVerifier> = Arc::new(HttpKeyVerifier::ai(config.ai_provider_base_url.clone())?);

        Ok(Self {
            config,
            stores,
            verifier,
            sessions,
            resolver,
            mail_keys,
            ai_keys,
        })
    }

    pub async fn create_prospect(&self, owner: UserId, input: NewProspect) -> Result<Prospect, WriteError> {
        let input = input.validate()?;
        let prospect = Prospect::create(ProspectId::new(), owner, input, Utc::now());
        self.stores.prospects.insert_prospect(&prospect).await?;
        Ok(prospect)
    }

    /// Log an activity on a prospect the caller owns.
    pub async fn log_activity(
        &self,
        subject: UserId,
        prospect_id: &str,
        input: NewActivity,
    ) -> Result<Activity, WriteError> {
        let prospect_id: ProspectId = prospect_id.parse().map_err(|_| DomainError::NotFound)?;
        let input = input.validate()?;

        let prospect = self
            .stores
            .prospects
            .find_prospect(prospect_id)
            .await?
            .ok_or(DomainError::NotFound)?;
        if !prospect.is_owned_by(subject) {
            return Err(DomainError::Forbidden.into());
        }

        let activity = input.into_activity(ActivityId::new(), prospect_id, Utc::now());
        self.stores.prospects.insert_activity(&activity).await?;
        Ok(activity)
    }

    pub async fn create_template(&self, owner: UserId, input: NewTemplate) -> Result<Template, WriteError> {
        let input = input.validate()?;
        let template = input.into_template(TemplateId::new(), owner, Utc::now());
        match self.stores.templates.insert_template(&template).await {
            Ok(()) => Ok(template),
            Err(StoreError::Conflict(_)) => Err(DomainError::conflict(format!(
                "a template named '{}' already exists",
                template.name
            ))
            .into()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn list_templates(&self, owner: UserId) -> Result<Vec<Template>, StoreError> {
        self.stores.templates.list_templates(owner).await
    }
}

/// Select and prepare the store adapter named by the configuration.
///
/// For Postgres, the schema is applied when the database is reachable; when
/// it is not, the process starts anyway and serves reads from the fallback.
pub async fn build_stores(config: &AppConfig) -> Stores {
    match config.store_backend {
        StoreBackend::Memory => {
            info!("using in-memory store");
            Stores::shared(Arc::new(InMemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let ctx = Arc::new(StoreContext::new(config.database_url.clone()));
            if !ctx.is_configured() {
                warn!("DATABASE_URL not set; store is unavailable");
            } else if let Err(e) = store::migrate(&ctx).await {
                warn!(error = %e, "schema migration failed; continuing in degraded mode");
            }
            Stores::shared(Arc::new(PostgresStore::new(ctx)))
        }
    }
}
