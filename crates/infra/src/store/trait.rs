use std::sync::Arc;

use async_trait::async_trait;

use prospector_core::{ProspectId, StoreResult, UserId};
use prospector_prospects::{Activity, Prospect, Template};

/// Prospect and activity persistence.
#[async_trait]
pub trait ProspectStore: Send + Sync {
    /// Load a prospect with its activities, newest first.
    async fn find_prospect(&self, id: ProspectId) -> StoreResult<Option<Prospect>>;

    /// Persist a new prospect. Activities on the value are ignored.
    async fn insert_prospect(&self, prospect: &Prospect) -> StoreResult<()>;

    /// Append an activity and bump the parent's `updated_at`.
    async fn insert_activity(&self, activity: &Activity) -> StoreResult<()>;
}

/// Email template persistence. Names are unique per owner.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn insert_template(&self, template: &Template) -> StoreResult<()>;

    /// Templates owned by `owner`, oldest first.
    async fn list_templates(&self, owner: UserId) -> StoreResult<Vec<Template>>;
}

#[async_trait]
impl<S> ProspectStore for Arc<S>
where
    S: ProspectStore + ?Sized,
{
    async fn find_prospect(&self, id: ProspectId) -> StoreResult<Option<Prospect>> {
        (**self).find_prospect(id).await
    }

    async fn insert_prospect(&self, prospect: &Prospect) -> StoreResult<()> {
        (**self).insert_prospect(prospect).await
    }

    async fn insert_activity(&self, activity: &Activity) -> StoreResult<()> {
        (**self).insert_activity(activity).await
    }
}

#[async_trait]
impl<S> TemplateStore for Arc<S>
where
    S: TemplateStore + ?Sized,
{
    async fn insert_template(&self, template: &Template) -> StoreResult<()> {
        (**self).insert_template(template).await
    }

    async fn list_templates(&self, owner: UserId) -> StoreResult<Vec<Template>> {
        (**self).list_templates(owner).await
    }
}
