//! Entity identifiers.
//!
//! An [`Entity`] is a plain index into the registry's slot space, valid in
//! `[0, capacity)`. There is no generation counter: once an entity is
//! despawned its index goes straight back on the freelist, so a handle held
//! across a despawn silently refers to whatever is spawned next at that
//! index. Callers that need stale-handle detection must track liveness
//! themselves (see [`Registry::contains`](crate::registry::Registry::contains)).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A plain, non-generational entity identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity(u32);

impl Entity {
    /// Construct an entity handle from a raw index.
    #[inline]
    pub fn from_index(index: u32) -> Self {
        Self(index)
    }

    /// The slot index this handle refers to.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
