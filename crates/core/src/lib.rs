//! `prospector-core`: shared building blocks.
//!
//! Strongly-typed identifiers, the domain error model, and the error contract
//! every storage adapter reports through.

pub mod entity;
pub mod error;
pub mod id;
pub mod store;

pub use entity::{Entity, Owned};
pub use error::{DomainError, DomainResult};
pub use id::{ActivityId, ProspectId, TemplateId, UserId};
pub use store::{StoreError, StoreResult};
