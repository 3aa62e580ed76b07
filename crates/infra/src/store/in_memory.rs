use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use prospector_auth::{CredentialStore, Identity, NewIdentity};
use prospector_core::{ProspectId, StoreError, StoreResult, UserId};
use prospector_prospects::{Activity, Prospect, Template, sort_by_recency};

use super::r#trait::{ProspectStore, TemplateStore};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, Identity>,
    prospects: HashMap<ProspectId, Prospect>,
    activities: HashMap<ProspectId, Vec<Activity>>,
    templates: Vec<Template>,
}

/// In-memory store for all three persistence traits.
///
/// Intended for tests/dev. [`InMemoryStore::set_failure`] makes every call
/// fail with the given error until cleared, which stands in for a database
/// outage.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    failure: RwLock<Option<StoreError>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every subsequent call with `failure`, or resume with `None`.
    pub fn set_failure(&self, failure: Option<StoreError>) {
        if let Ok(mut slot) = self.failure.write() {
            *slot = failure;
        }
    }

    pub fn go_offline(&self) {
        self.set_failure(Some(StoreError::unavailable("in-memory store offline")));
    }

    pub fn go_online(&self) {
        self.set_failure(None);
    }

    fn check(&self) -> StoreResult<()> {
        let slot = self
            .failure
            .read()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        match slot.as_ref() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn read(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, Tables>> {
        self.check()?;
        self.tables
            .read()
            .map_err(|_| StoreError::backend("lock poisoned"))
    }

    fn write(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, Tables>> {
        self.check()?;
        self.tables
            .write()
            .map_err(|_| StoreError::backend("lock poisoned"))
    }
}

#[async_trait]
impl CredentialStore for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Identity>> {
        let tables = self.read()?;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn create(&self, identity: NewIdentity) -> StoreResult<Identity> {
        let mut tables = self.write()?;
        if tables.users.values().any(|u| u.email == identity.email) {
            return Err(StoreError::conflict("users.email"));
        }
        let created = Identity {
            id: UserId::new(),
            email: identity.email,
            name: identity.name,
            password_hash: identity.password_hash,
        };
        tables.users.insert(created.id, created.clone());
        Ok(created)
    }
}

#[async_trait]
impl ProspectStore for InMemoryStore {
    async fn find_prospect(&self, id: ProspectId) -> StoreResult<Option<Prospect>> {
        let tables = self.read()?;
        let Some(prospect) = tables.prospects.get(&id) else {
            return Ok(None);
        };
        let activities = tables.activities.get(&id).cloned().unwrap_or_default();
        Ok(Some(prospect.clone().with_activities(activities)))
    }

    async fn insert_prospect(&self, prospect: &Prospect) -> StoreResult<()> {
        let mut tables = self.write()?;
        if tables.prospects.contains_key(&prospect.id) {
            return Err(StoreError::conflict("prospects.id"));
        }
        let mut stored = prospect.clone();
        stored.activities.clear();
        tables.prospects.insert(stored.id, stored);
        Ok(())
    }

    async fn insert_activity(&self, activity: &Activity) -> StoreResult<()> {
        let mut tables = self.write()?;
        let Some(prospect) = tables.prospects.get_mut(&activity.prospect_id) else {
            return Err(StoreError::backend(format!(
                "prospect {} does not exist",
                activity.prospect_id
            )));
        };
        if activity.occurred_at > prospect.updated_at {
            prospect.updated_at = activity.occurred_at;
        }
        let list = tables.activities.entry(activity.prospect_id).or_default();
        list.push(activity.clone());
        sort_by_recency(list);
        Ok(())
    }
}

#[async_trait]
impl TemplateStore for InMemoryStore {
    async fn insert_template(&self, template: &Template) -> StoreResult<()> {
        let mut tables = self.write()?;
        if tables
            .templates
            .iter()
            .any(|t| t.owner_id == template.owner_id && t.name == template.name)
        {
            return Err(StoreError::conflict("email_templates.owner_id, name"));
        }
        tables.templates.push(template.clone());
        Ok(())
    }

    async fn list_templates(&self, owner: UserId) -> StoreResult<Vec<Template>> {
        let tables = self.read()?;
        Ok(tables
            .templates
            .iter()
            .filter(|t| t.owner_id == owner)
            .cloned()
            .collect())
    }
}
