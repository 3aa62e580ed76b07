//! The two shapes a prospect read can take.
//!
//! Real and synthetic prospects carry different guarantees (synthetic ones have
//! no owner and no audit trail), so they are distinct types joined only at the
//! response boundary.

use chrono::{DateTime, Utc};
use serde::Serialize;

use prospector_core::{ProspectId, UserId};

use crate::{Activity, Prospect, ProspectStatus};

/// Change history attached to a real prospect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditTrail {
    pub changed_by: UserId,
    pub changed_at: DateTime<Utc>,
    pub change: String,
}

/// A prospect served from the real store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProspectRecord {
    pub id: ProspectId,
    pub owner_id: UserId,
    pub name: String,
    pub email: Option<String>,
    pub company: Option<String>,
    pub title: Option<String>,
    pub status: ProspectStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub activities: Vec<Activity>,
    /// Always present on the wire; `null` until audit history is recorded.
    pub audit: Option<AuditTrail>,
}

impl From<Prospect> for ProspectRecord {
    fn from(p: Prospect) -> Self {
        Self {
            id: p.id,
            owner_id: p.owner_id,
            name: p.name,
            email: p.email,
            company: p.company,
            title: p.title,
            status: p.status,
            created_at: p.created_at,
            updated_at: p.updated_at,
            activities: p.activities,
            audit: None,
        }
    }
}

/// A deterministic stand-in derived only from the requested id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntheticProspect {
    pub id: ProspectId,
    pub name: String,
    pub email: String,
    pub company: String,
    pub title: String,
    pub status: ProspectStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub activities: Vec<Activity>,
}

/// Outcome of a successful prospect read, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum ResolvedProspect {
    Real(ProspectRecord),
    Synthetic(SyntheticProspect),
}

impl ResolvedProspect {
    pub fn id(&self) -> ProspectId {
        match self {
            ResolvedProspect::Real(r) => r.id,
            ResolvedProspect::Synthetic(s) => s.id,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, ResolvedProspect::Synthetic(_))
    }
}
