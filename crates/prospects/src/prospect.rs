use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use prospector_core::{ActivityId, DomainError, DomainResult, Entity, Owned, ProspectId, UserId};

/// Pipeline stage of a prospect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProspectStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Lost,
}

impl ProspectStatus {
    pub const ALL: [ProspectStatus; 4] = [
        ProspectStatus::New,
        ProspectStatus::Contacted,
        ProspectStatus::Qualified,
        ProspectStatus::Lost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProspectStatus::New => "new",
            ProspectStatus::Contacted => "contacted",
            ProspectStatus::Qualified => "qualified",
            ProspectStatus::Lost => "lost",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Note,
    Email,
    Call,
    Meeting,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 4] = [
        ActivityKind::Note,
        ActivityKind::Email,
        ActivityKind::Call,
        ActivityKind::Meeting,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Note => "note",
            ActivityKind::Email => "email",
            ActivityKind::Call => "call",
            ActivityKind::Meeting => "meeting",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }
}

/// An entry in a prospect's activity history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub prospect_id: ProspectId,
    pub kind: ActivityKind,
    pub summary: String,
    pub occurred_at: DateTime<Utc>,
}

/// Order activities newest first; ties break on id so the order is total.
pub fn sort_by_recency(activities: &mut [Activity]) {
    activities.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at).then_with(|| b.id.cmp(&a.id)));
}

/// A persisted prospect, owned by exactly one identity.
///
/// # Invariants
/// - `activities` is ordered newest first.
/// - Only `owner_id` may read or write it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prospect {
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
}

impl Prospect {
    /// Build a fresh prospect from validated input.
    pub fn create(id: ProspectId, owner_id: UserId, input: NewProspect, now: DateTime<Utc>) -> Self {
        Self {
            id,
            owner_id,
            name: input.name,
            email: input.email,
            company: input.company,
            title: input.title,
            status: input.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
            activities: Vec::new(),
        }
    }

    pub fn with_activities(mut self, mut activities: Vec<Activity>) -> Self {
        sort_by_recency(&mut activities);
        self.activities = activities;
        self
    }
}

impl Entity for Prospect {
    type Id = ProspectId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Owned for Prospect {
    fn owner_id(&self) -> UserId {
        self.owner_id
    }
}

/// Input for creating a prospect.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct NewProspect {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<ProspectStatus>,
}

impl NewProspect {
    /// Trim fields, drop blank optionals, and check required ones.
    pub fn validate(self) -> DomainResult<Self> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("name is required"));
        }

        let email = non_blank(self.email);
        if let Some(email) = &email {
            if !email.contains('@') {
                return Err(DomainError::validation("invalid email format"));
            }
        }

        Ok(Self {
            name,
            email,
            company: non_blank(self.company),
            title: non_blank(self.title),
            status: self.status,
        })
    }
}

/// Input for logging an activity against a prospect.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewActivity {
    pub kind: ActivityKind,
    pub summary: String,
    #[serde(default)]
    pub occurred_at: Option<DateTime<Utc>>,
}

impl NewActivity {
    pub fn validate(self) -> DomainResult<Self> {
        let summary = self.summary.trim().to_string();
        if summary.is_empty() {
            return Err(DomainError::validation("summary is required"));
        }
        Ok(Self { summary, ..self })
    }

    pub fn into_activity(self, id: ActivityId, prospect_id: ProspectId, now: DateTime<Utc>) -> Activity {
        Activity {
            id,
            prospect_id,
            kind: self.kind,
            summary: self.summary,
            occurred_at: self.occurred_at.unwrap_or(now),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn new_prospect_requires_a_name() {
        let err = NewProspect {
            name: "  ".to_string(),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err, DomainError::validation("name is required"));
    }

    #[test]
    fn new_prospect_normalizes_optionals() {
        let p = NewProspect {
            name: " Ada Lovelace ".to_string(),
            email: Some("  ".to_string()),
            company: Some(" Analytical Engines ".to_string()),
            title: None,
            status: None,
        }
        .validate()
        .unwrap();

        assert_eq!(p.name, "Ada Lovelace");
        assert_eq!(p.email, None);
        assert_eq!(p.company.as_deref(), Some("Analytical Engines"));
    }

    #[test]
    fn new_prospect_rejects_malformed_email() {
        let err = NewProspect {
            name: "Ada".to_string(),
            email: Some("ada.example.com".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn activities_are_ordered_newest_first() {
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let pid = ProspectId::new();
        let mk = |offset_days: i64| Activity {
            id: ActivityId::new(),
            prospect_id: pid,
            kind: ActivityKind::Note,
            summary: format!("day {offset_days}"),
            occurred_at: t0 + Duration::days(offset_days),
        };

        let p = Prospect::create(pid, UserId::new(), NewProspect { name: "Ada".into(), ..Default::default() }, t0)
            .with_activities(vec![mk(1), mk(5), mk(3)]);

        let order: Vec<_> = p.activities.iter().map(|a| a.summary.as_str()).collect();
        assert_eq!(order, ["day 5", "day 3", "day 1"]);
    }

    #[test]
    fn ownership() {
        let owner = UserId::new();
        let p = Prospect::create(ProspectId::new(), owner, NewProspect { name: "Ada".into(), ..Default::default() }, Utc::now());
        assert!(p.is_owned_by(owner));
        assert!(!p.is_owned_by(UserId::new()));
    }

    #[test]
    fn status_and_kind_parse_their_wire_names() {
        for s in ProspectStatus::ALL {
            assert_eq!(ProspectStatus::parse(s.as_str()), Some(s));
        }
        for k in ActivityKind::ALL {
            assert_eq!(ActivityKind::parse(k.as_str()), Some(k));
        }
        assert_eq!(ProspectStatus::parse("won"), None);
    }
}
