//! Prospect reads with a synthetic fallback.
//!
//! The resolver owns the read-path policy:
//!
//! - no session subject: `Unauthenticated`, before any store access
//! - id that is not a prospect id: `NotFound`
//! - stored record owned by someone else: `Forbidden`
//! - store answered "no such record": `NotFound`
//! - store could not answer: a deterministic synthetic record for the id

use tracing::{debug, info, instrument, warn};

use prospector_core::{DomainError, DomainResult, Owned, ProspectId, UserId};
use prospector_prospects::{ResolvedProspect, synthesize};

use crate::store::ProspectStore;

#[derive(Debug, Clone)]
pub struct ProspectResolver<S> {
    store: S,
}

impl<S> ProspectResolver<S>
where
    S: ProspectStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[instrument(skip_all, fields(prospect_id = %id))]
    pub async fn resolve(&self, subject: Option<UserId>, id: &str) -> DomainResult<ResolvedProspect> {
        let subject = subject.ok_or(DomainError::Unauthenticated)?;

        let Ok(prospect_id) = id.parse::<ProspectId>() else {
            debug!("unparseable prospect id");
            return Err(DomainError::NotFound);
        };

        match self.store.find_prospect(prospect_id).await {
            Ok(Some(prospect)) => {
                if !prospect.is_owned_by(subject) {
                    return Err(DomainError::Forbidden);
                }
                Ok(ResolvedProspect::Real(prospect.into()))
            }
            Ok(None) => Err(DomainError::NotFound),
            Err(err) => {
                warn!(error = %err, "prospect store failed");
                let synthetic = synthesize(id).ok_or(DomainError::NotFound)?;
                info!(source = "synthetic", "serving fallback prospect");
                Ok(ResolvedProspect::Synthetic(synthetic))
            }
        }
    }
}
