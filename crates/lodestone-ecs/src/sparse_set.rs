//! Packed component storage.
//!
//! A [`SparseSet`] maps small integer entity ids to densely packed values.
//! Insert, lookup, and removal are all O(1); removal swaps the last dense
//! element into the freed slot, so **iteration order is unspecified and may
//! change after any removal**. Code that needs stable ordering must keep a
//! secondary index of its own.

use crate::entity::Entity;
use crate::EcsError;

/// Sentinel marking an empty sparse slot.
const EMPTY: usize = usize::MAX;

/// A fixed-capacity map from [`Entity`] to densely packed `T` values.
///
/// Capacity is chosen at construction and never grows. `sparse[id]` holds the
/// position of `id`'s value in the dense arrays, or [`EMPTY`]; `dense[k]` and
/// `data[k]` move in lockstep, so `sparse[dense[k].index()] == k` for every
/// live slot.
#[derive(Debug, Clone)]
pub struct SparseSet<T> {
    sparse: Vec<usize>,
    dense: Vec<Entity>,
    data: Vec<T>,
}

impl<T> SparseSet<T> {
    /// Create an empty set able to hold ids in `[0, capacity)`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sparse: vec![EMPTY; capacity],
            dense: Vec::with_capacity(capacity),
            data: Vec::with_capacity(capacity),
        }
    }

    /// The id range this set accepts.
    pub fn capacity(&self) -> usize {
        self.sparse.len()
    }

    /// Number of values currently stored.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the set holds no values.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Insert a value for `entity`.
    ///
    /// Fails with [`EcsError::IndexOutOfRange`] when the id is outside the
    /// set's capacity and [`EcsError::SlotOccupied`] when the id already has
    /// a value. Use [`remove`](Self::remove) first to replace.
    pub fn insert(&mut self, entity: Entity, value: T) -> Result<(), EcsError> {
        let index = entity.index();
        if index >= self.sparse.len() {
            return Err(EcsError::IndexOutOfRange {
                index,
                capacity: self.sparse.len(),
            });
        }
        if self.sparse[index] != EMPTY {
            return Err(EcsError::SlotOccupied { index });
        }

        self.sparse[index] = self.data.len();
        self.dense.push(entity);
        self.data.push(value);
        Ok(())
    }

    /// Whether `entity` currently has a value.
    pub fn contains(&self, entity: Entity) -> bool {
        self.sparse
            .get(entity.index())
            .is_some_and(|&k| k != EMPTY)
    }

    /// Remove the value for `entity`. Returns `false` if it was absent.
    ///
    /// Removal swaps the last dense element into the freed slot and patches
    /// the moved entity's sparse pointer.
    pub fn remove(&mut self, entity: Entity) -> bool {
        let index = entity.index();
        if index >= self.sparse.len() || self.sparse[index] == EMPTY {
            return false;
        }

        let dense_index = self.sparse[index];
        self.dense.swap_remove(dense_index);
        self.data.swap_remove(dense_index);

        // The element that lived at the tail now sits at dense_index.
        if dense_index < self.dense.len() {
            let moved = self.dense[dense_index];
            self.sparse[moved.index()] = dense_index;
        }
        self.sparse[index] = EMPTY;
        true
    }

    /// Borrow the value for `entity`, or `None` if absent.
    pub fn get(&self, entity: Entity) -> Option<&T> {
        let k = *self.sparse.get(entity.index())?;
        if k == EMPTY {
            return None;
        }
        Some(&self.data[k])
    }

    /// Mutably borrow the value for `entity`, or `None` if absent.
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let k = *self.sparse.get(entity.index())?;
        if k == EMPTY {
            return None;
        }
        Some(&mut self.data[k])
    }

    /// Iterate over `(Entity, &T)` pairs in dense order.
    ///
    /// The order is unspecified and changes after removals.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.dense.iter().copied().zip(self.data.iter())
    }

    /// Iterate over `(Entity, &mut T)` pairs in dense order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.dense.iter().copied().zip(self.data.iter_mut())
    }

    /// Drop every value, keeping the capacity.
    pub fn clear(&mut self) {
        self.sparse.fill(EMPTY);
        self.dense.clear();
        self.data.clear();
    }
}
