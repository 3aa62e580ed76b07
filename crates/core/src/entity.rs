//! Entity trait: identity + ownership.

use crate::UserId;

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// An entity bound to exactly one owning identity.
///
/// Reads and writes are only permitted when the caller's subject id equals
/// `owner_id()`.
pub trait Owned: Entity {
    fn owner_id(&self) -> UserId;

    fn is_owned_by(&self, subject: UserId) -> bool {
        self.owner_id() == subject
    }
}
