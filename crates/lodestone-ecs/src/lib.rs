//! Lodestone ECS -- sparse-set entity-component storage.
//!
//! This crate provides the storage layer for the Lodestone simulation core.
//! Entities are plain recycled indices; each component type lives in its own
//! packed [`SparseSet`](sparse_set::SparseSet) keyed by entity id, giving
//! O(1) insert, lookup, and swap-removal with cache-friendly dense iteration.
//!
//! # Quick Start
//!
//! ```
//! use lodestone_ecs::prelude::*;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Position { x: f32, y: f32 }
//!
//! let mut registry = Registry::with_capacity(64);
//! registry.register::<Position>("position");
//!
//! let entity = registry.spawn().unwrap();
//! registry.add(entity, Position { x: 1.0, y: 2.0 }).unwrap();
//!
//! assert_eq!(registry.get::<Position>(entity), Some(&Position { x: 1.0, y: 2.0 }));
//! ```

#![deny(unsafe_code)]

pub mod entity;
pub mod registry;
pub mod sparse_set;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by storage operations.
#[derive(Debug, thiserror::Error)]
pub enum EcsError {
    /// No free entity ids remain.
    #[error("entity capacity {capacity} exhausted")]
    Exhausted { capacity: usize },

    /// The entity is not currently live.
    #[error("entity {entity} does not exist")]
    NoSuchEntity { entity: entity::Entity },

    /// A component type was used that has not been registered.
    #[error("component type '{name}' not registered. Registered components: [{registered}]")]
    UnknownComponent { name: String, registered: String },

    /// An entity id outside the store's capacity.
    #[error("entity id {index} is out of range for capacity {capacity}")]
    IndexOutOfRange { index: usize, capacity: usize },

    /// The entity already has a value in this store.
    #[error("entity id {index} already has a value in this store")]
    SlotOccupied { index: usize },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::entity::Entity;
    pub use crate::registry::Registry;
    pub use crate::sparse_set::SparseSet;
    pub use crate::EcsError;
}

// ---------------------------------------------------------------------------
// Integration Tests
// ---------------------------------------------------------------------------
