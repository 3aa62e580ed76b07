use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use prospector_core::{DomainError, DomainResult, Entity, Owned, TemplateId, UserId};

pub const MAX_TEMPLATE_NAME_LEN: usize = 120;

/// Reusable email template. `name` is unique per owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Template {
    pub id: TemplateId,
    pub owner_id: UserId,
    pub name: String,
    pub subject: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Entity for Template {
    type Id = TemplateId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Owned for Template {
    fn owner_id(&self) -> UserId {
        self.owner_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewTemplate {
    pub name: String,
    pub subject: String,
    pub body: String,
}

impl NewTemplate {
    pub fn validate(self) -> DomainResult<Self> {
        let name = self.name.trim().to_string();
        let subject = self.subject.trim().to_string();

        if name.is_empty() {
            return Err(DomainError::validation("name is required"));
        }
        if name.chars().count() > MAX_TEMPLATE_NAME_LEN {
            return Err(DomainError::validation(format!(
                "name must be at most {MAX_TEMPLATE_NAME_LEN} characters"
            )));
        }
        if subject.is_empty() {
            return Err(DomainError::validation("subject is required"));
        }
        if self.body.trim().is_empty() {
            return Err(DomainError::validation("body is required"));
        }

        Ok(Self {
            name,
            subject,
            body: self.body,
        })
    }

    pub fn into_template(self, id: TemplateId, owner_id: UserId, now: DateTime<Utc>) -> Template {
        Template {
            id,
            owner_id,
            name: self.name,
            subject: self.subject,
            body: self.body,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, subject: &str, body: &str) -> NewTemplate {
        NewTemplate {
            name: name.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn required_fields() {
        assert!(input("", "Hi", "Body").validate().is_err());
        assert!(input("Intro", " ", "Body").validate().is_err());
        assert!(input("Intro", "Hi", "\n").validate().is_err());
        assert!(input(&"x".repeat(MAX_TEMPLATE_NAME_LEN + 1), "Hi", "Body").validate().is_err());
    }

    #[test]
    fn body_whitespace_is_preserved() {
        let t = input(" Intro ", " Hello {{name}} ", "Hi,\n\nThanks!\n").validate().unwrap();
        assert_eq!(t.name, "Intro");
        assert_eq!(t.subject, "Hello {{name}}");
        assert_eq!(t.body, "Hi,\n\nThanks!\n");
    }
}
