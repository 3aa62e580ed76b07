//! Prospects domain module.
//!
//! Prospects with their activity history, email templates, and the synthetic
//! stand-ins served when real storage cannot answer. Pure domain logic: no IO,
//! no HTTP, no storage.

pub mod prospect;
pub mod resolved;
pub mod synthetic;
pub mod template;

pub use prospect::{Activity, ActivityKind, NewActivity, NewProspect, Prospect, ProspectStatus, sort_by_recency};
pub use resolved::{AuditTrail, ProspectRecord, ResolvedProspect, SyntheticProspect};
pub use synthetic::synthesize;
pub use template::{NewTemplate, Template};
