//! Infrastructure adapters: configuration, persistence, the prospect resolver
//! and outbound provider checks.

pub mod config;
pub mod external;
pub mod resolver;
pub mod store;

pub use config::{AppConfig, ConfigError, StoreBackend};
pub use external::{HttpKeyVerifier, KeyCheckError, KeyIdentity, KeyVerifier, Provider};
pub use resolver::ProspectResolver;
pub use store::{InMemoryStore, PostgresStore, ProspectStore, StoreContext, TemplateStore};
