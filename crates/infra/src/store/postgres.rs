//! Postgres adapter for identities, prospects and templates.
//!
//! ## Error mapping
//!
//! | sqlx error | StoreError |
//! |------------|------------|
//! | Database, code `23505` | `Conflict` |
//! | PoolTimedOut, PoolClosed, Io, Tls | `Unavailable` |
//! | anything else | `Backend` |
//!
//! A missing `DATABASE_URL` or a failed first connect surfaces as
//! `Unavailable` from [`StoreContext::pool`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::postgres::PgRow;
use tracing::{Span, instrument};
use uuid::Uuid;

use prospector_auth::{CredentialStore, Identity, NewIdentity};
use prospector_core::{ProspectId, StoreError, StoreResult, UserId};
use prospector_prospects::{Activity, ActivityKind, Prospect, ProspectStatus, Template};

use super::context::StoreContext;
use super::r#trait::{ProspectStore, TemplateStore};

const SCHEMA: &str = include_str!("../../migrations/0001_init.sql");

/// Apply the schema. Statements are idempotent.
#[instrument(skip(ctx), err)]
pub async fn migrate(ctx: &StoreContext) -> StoreResult<()> {
    let pool = ctx.pool().await?;
    sqlx::raw_sql(SCHEMA)
        .execute(pool)
        .await
        .map_err(|e| map_sqlx_error("migrate", e))?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct PostgresStore {
    ctx: Arc<StoreContext>,
}

impl PostgresStore {
    pub fn new(ctx: Arc<StoreContext>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &Arc<StoreContext> {
        &self.ctx
    }
}

#[async_trait]
impl CredentialStore for PostgresStore {
    #[instrument(skip(self, email), err)]
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Identity>> {
        let pool = self.ctx.pool().await?;
        let row = sqlx::query(
            r#"
            SELECT id, email, name, password_hash
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_email", e))?;

        row.map(|r| identity_from_row(&r)).transpose()
    }

    #[instrument(skip(self, identity), fields(user_id), err)]
    async fn create(&self, identity: NewIdentity) -> StoreResult<Identity> {
        let pool = self.ctx.pool().await?;
        let id = UserId::new();
        Span::current().record("user_id", tracing::field::display(id));

        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, password_hash)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(id.as_uuid())
        .bind(&identity.email)
        .bind(&identity.name)
        .bind(&identity.password_hash)
        .execute(pool)
        .await
        .map_err(|e| map_sqlx_error("create_identity", e))?;

        Ok(Identity {
            id,
            email: identity.email,
            name: identity.name,
            password_hash: identity.password_hash,
        })
    }
}

#[async_trait]
impl ProspectStore for PostgresStore {
    #[instrument(skip(self), fields(prospect_id = %id, activity_count), err)]
    async fn find_prospect(&self, id: ProspectId) -> StoreResult<Option<Prospect>> {
        let pool = self.ctx.pool().await?;

        let Some(row) = sqlx::query(
            r#"
            SELECT id, owner_id, name, email, company, title, status, created_at, updated_at
            FROM prospects
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(pool)
        .await
        .map_err(|e| map_sqlx_error("find_prospect", e))?
        else {
            return Ok(None);
        };

        let prospect = prospect_from_row(&row)?;

        let rows = sqlx::query(
            r#"
            SELECT id, prospect_id, kind, summary, occurred_at
            FROM prospect_activities
            WHERE prospect_id = $1
            ORDER BY occurred_at DESC, id DESC
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(pool)
        .await
        .map_err(|e| map_sqlx_error("load_activities", e))?;

        let activities = rows
            .iter()
            .map(activity_from_row)
            .collect::<StoreResult<Vec<_>>>()?;

        Span::current().record("activity_count", activities.len());
        Ok(Some(prospect.with_activities(activities)))
    }

    #[instrument(skip(self, prospect), fields(prospect_id = %prospect.id), err)]
    async fn insert_prospect(&self, prospect: &Prospect) -> StoreResult<()> {
        let pool = self.ctx.pool().await?;
        sqlx::query(
            r#"
            INSERT INTO prospects
                (id, owner_id, name, email, company, title, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(prospect.id.as_uuid())
        .bind(prospect.owner_id.as_uuid())
        .bind(&prospect.name)
        .bind(&prospect.email)
        .bind(&prospect.company)
        .bind(&prospect.title)
        .bind(prospect.status.as_str())
        .bind(prospect.created_at)
        .bind(prospect.updated_at)
        .execute(pool)
        .await
        .map_err(|e| map_sqlx_error("insert_prospect", e))?;
        Ok(())
    }

    #[instrument(
        skip(self, activity),
        fields(prospect_id = %activity.prospect_id, activity_id = %activity.id),
        err
    )]
    async fn insert_activity(&self, activity: &Activity) -> StoreResult<()> {
        let pool = self.ctx.pool().await?;
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin", e))?;

        sqlx::query(
            r#"
            INSERT INTO prospect_activities (id, prospect_id, kind, summary, occurred_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(activity.id.as_uuid())
        .bind(activity.prospect_id.as_uuid())
        .bind(activity.kind.as_str())
        .bind(&activity.summary)
        .bind(activity.occurred_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("insert_activity", e))?;

        sqlx::query(
            r#"
            UPDATE prospects
            SET updated_at = GREATEST(updated_at, $2)
            WHERE id = $1
            "#,
        )
        .bind(activity.prospect_id.as_uuid())
        .bind(activity.occurred_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("touch_prospect", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit", e))?;
        Ok(())
    }
}

#[async_trait]
impl TemplateStore for PostgresStore {
    #[instrument(skip(self, template), fields(owner_id = %template.owner_id), err)]
    async fn insert_template(&self, template: &Template) -> StoreResult<()> {
        let pool = self.ctx.pool().await?;
        sqlx::query(
            r#"
            INSERT INTO email_templates (id, owner_id, name, subject, body, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(template.id.as_uuid())
        .bind(template.owner_id.as_uuid())
        .bind(&template.name)
        .bind(&template.subject)
        .bind(&template.body)
        .bind(template.created_at)
        .execute(pool)
        .await
        .map_err(|e| map_sqlx_error("insert_template", e))?;
        Ok(())
    }

    #[instrument(skip(self), fields(owner_id = %owner), err)]
    async fn list_templates(&self, owner: UserId) -> StoreResult<Vec<Template>> {
        let pool = self.ctx.pool().await?;
        let rows = sqlx::query(
            r#"
            SELECT id, owner_id, name, subject, body, created_at
            FROM email_templates
            WHERE owner_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(owner.as_uuid())
        .fetch_all(pool)
        .await
        .map_err(|e| map_sqlx_error("list_templates", e))?;

        rows.iter().map(template_from_row).collect()
    }
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> StoreResult<T>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name)
        .map_err(|e| StoreError::backend(format!("column {name}: {e}")))
}

fn identity_from_row(row: &PgRow) -> StoreResult<Identity> {
    Ok(Identity {
        id: UserId::from_uuid(column::<Uuid>(row, "id")?),
        email: column(row, "email")?,
        name: column(row, "name")?,
        password_hash: column(row, "password_hash")?,
    })
}

fn prospect_from_row(row: &PgRow) -> StoreResult<Prospect> {
    let status: String = column(row, "status")?;
    let status = ProspectStatus::parse(&status)
        .ok_or_else(|| StoreError::backend(format!("unknown prospect status '{status}'")))?;

    Ok(Prospect {
        id: ProspectId::from_uuid(column::<Uuid>(row, "id")?),
        owner_id: UserId::from_uuid(column::<Uuid>(row, "owner_id")?),
        name: column(row, "name")?,
        email: column(row, "email")?,
        company: column(row, "company")?,
        title: column(row, "title")?,
        status,
        created_at: column::<DateTime<Utc>>(row, "created_at")?,
        updated_at: column::<DateTime<Utc>>(row, "updated_at")?,
        activities: Vec::new(),
    })
}

fn activity_from_row(row: &PgRow) -> StoreResult<Activity> {
    let kind: String = column(row, "kind")?;
    let kind = ActivityKind::parse(&kind)
        .ok_or_else(|| StoreError::backend(format!("unknown activity kind '{kind}'")))?;

    Ok(Activity {
        id: column::<Uuid>(row, "id")?.into(),
        prospect_id: ProspectId::from_uuid(column::<Uuid>(row, "prospect_id")?),
        kind,
        summary: column(row, "summary")?,
        occurred_at: column::<DateTime<Utc>>(row, "occurred_at")?,
    })
}

fn template_from_row(row: &PgRow) -> StoreResult<Template> {
    Ok(Template {
        id: column::<Uuid>(row, "id")?.into(),
        owner_id: UserId::from_uuid(column::<Uuid>(row, "owner_id")?),
        name: column(row, "name")?,
        subject: column(row, "subject")?,
        body: column(row, "body")?,
        created_at: column::<DateTime<Utc>>(row, "created_at")?,
    })
}

pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {operation}: {}", db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => StoreError::Conflict(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            StoreError::unavailable(format!("connection pool unavailable in {operation}"))
        }
        sqlx::Error::Io(e) => StoreError::unavailable(format!("io error in {operation}: {e}")),
        sqlx::Error::Tls(e) => StoreError::unavailable(format!("tls error in {operation}: {e}")),
        other => StoreError::backend(format!("sqlx error in {operation}: {other}")),
    }
}
