//! Lazily-connected Postgres pool shared by every store adapter.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::OnceCell;
use tracing::{info, instrument};

use prospector_core::{StoreError, StoreResult};

const MAX_CONNECTIONS: u32 = 10;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Owns the single connection pool for the process.
///
/// The pool object is built on first use without touching the network, so
/// every caller shares it immediately. Connections are opened per acquire;
/// an unreachable database surfaces on each query as an unavailable store
/// after at most the acquire timeout, independently of other callers.
#[derive(Debug)]
pub struct StoreContext {
    database_url: Option<String>,
    acquire_timeout: Duration,
    pool: OnceCell<PgPool>,
}

impl StoreContext {
    pub fn new(database_url: Option<String>) -> Self {
        Self {
            database_url,
            acquire_timeout: ACQUIRE_TIMEOUT,
            pool: OnceCell::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.database_url.is_some()
    }

    #[instrument(skip(self))]
    pub async fn pool(&self) -> StoreResult<&PgPool> {
        let Some(url) = self.database_url.as_deref() else {
            return Err(StoreError::unavailable("DATABASE_URL is not configured"));
        };

        self.pool
            .get_or_try_init(|| async {
                let pool = PgPoolOptions::new()
                    .max_connections(MAX_CONNECTIONS)
                    .acquire_timeout(self.acquire_timeout)
                    .connect_lazy(url)
                    .map_err(|e| StoreError::unavailable(format!("invalid database url: {e}")))?;
                info!("postgres pool created");
                Ok::<_, StoreError>(pool)
            })
            .await
    }
}
