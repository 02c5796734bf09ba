//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Store-assigned identities are absent until the entity has been persisted,
/// so the identifier is optional.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier, if one has been assigned.
    fn id(&self) -> Option<Self::Id>;

    /// `true` once the store has assigned an identity.
    fn is_persisted(&self) -> bool {
        self.id().is_some()
    }
}
