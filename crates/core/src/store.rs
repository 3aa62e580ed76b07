//! Storage error contract.
//!
//! Adapters report "not found" as `Ok(None)`. Everything in [`StoreError`] is a
//! failure of the data path itself, which callers branch on: reads may fall back
//! to synthetic data, writes surface a generic server error.

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached (missing configuration, connect failure,
    /// closed pool). Reported once per call, never retried.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A unique constraint rejected the write.
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    /// The store answered, but not in a usable way (schema mismatch, bad row,
    /// unexpected database error).
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
