//! Persistence boundary for prospecting data.
//!
//! Adapters return `Ok(None)` for a missing record and reserve
//! [`StoreError`](prospector_core::StoreError) for a failed data path, so
//! callers can tell "not there" apart from "could not look".

pub mod context;
pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use context::StoreContext;
pub use in_memory::InMemoryStore;
pub use postgres::{PostgresStore, migrate};
pub use r#trait::{ProspectStore, TemplateStore};
