//! Password hashing primitive (Argon2id).

use std::sync::Arc;

use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("invalid hash parameters: {0}")]
    InvalidParams(String),

    #[error("salt generation failed: {0}")]
    Salt(String),

    #[error("hashing failed: {0}")]
    Hash(String),
}

/// One-way password function with a verify operation.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// Returns `false` for a mismatch and for an unparseable stored hash alike.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

impl<H> PasswordHasher for Arc<H>
where
    H: PasswordHasher + ?Sized,
{
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        (**self).hash(password)
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        (**self).verify(password, hash)
    }
}

/// Argon2id work factor.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct HashCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl HashCost {
    /// Lowest cost accepted for production configuration (OWASP Argon2id
    /// baseline: 19 MiB, 2 passes).
    pub const PRODUCTION_FLOOR: HashCost = HashCost {
        memory_kib: 19_456,
        iterations: 2,
        parallelism: 1,
    };

    pub const fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        Self {
            memory_kib,
            iterations,
            parallelism,
        }
    }

    pub fn meets_production_floor(&self) -> bool {
        self.memory_kib >= Self::PRODUCTION_FLOOR.memory_kib
            && self.iterations >= Self::PRODUCTION_FLOOR.iterations
            && self.parallelism >= 1
    }
}

impl Default for HashCost {
    fn default() -> Self {
        Self::new(19_456, 3, 1)
    }
}

/// Argon2id hasher producing PHC strings (`$argon2id$v=19$...`).
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    pub fn new(cost: HashCost) -> Result<Self, PasswordError> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'_> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let mut salt_bytes = [0u8; 16];
        getrandom::getrandom(&mut salt_bytes).map_err(|e| PasswordError::Salt(e.to_string()))?;
        let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| PasswordError::Salt(e.to_string()))?;

        let phc = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::Hash(e.to_string()))?;
        Ok(phc.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            // Parameters come from the PHC string, so hashes made under an older
            // cost keep verifying after the cost is raised.
            Ok(parsed) => self.argon2().verify_password(password.as_bytes(), &parsed).is_ok(),
            Err(_) => false,
        }
    }
}
