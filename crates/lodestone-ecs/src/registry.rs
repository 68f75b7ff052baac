//! Entity registry: id allocation plus one packed store per component type.
//!
//! The [`Registry`] owns the entity freelist, an existence bitmap, and a
//! type-indexed collection of [`SparseSet`] stores. Component types are
//! registered once up front; every accessor then dispatches through the
//! type's `TypeId` rather than a per-type branch, so adding a component type
//! is one `register` call.
//!
//! Ids are recycled LIFO with no generation tag. A despawned id is handed
//! out again by the very next [`spawn`](Registry::spawn), and any handle
//! still held for the old entity aliases to the new one. This is part of the
//! registry's contract, not an oversight; callers that outlive a despawn
//! must consult [`contains`](Registry::contains).

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;

use crate::entity::Entity;
use crate::sparse_set::SparseSet;
use crate::EcsError;

// ---------------------------------------------------------------------------
// Type-erased store access
// ---------------------------------------------------------------------------

/// Object-safe view of a component store, enough for `despawn` to erase an
/// entity from every store without knowing the component types.
trait ErasedStore {
    fn erase(&mut self, entity: Entity) -> bool;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: 'static> ErasedStore for SparseSet<T> {
    fn erase(&mut self, entity: Entity) -> bool {
        self.remove(entity)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

struct StoreEntry {
    /// Human-readable name supplied at registration, used in error messages.
    name: String,
    store: Box<dyn ErasedStore>,
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Allocates entity ids and owns the per-component-type packed stores.
pub struct Registry {
    capacity: usize,
    alive: Vec<bool>,
    alive_count: usize,
    /// LIFO freelist, seeded descending so the first id handed out is 0.
    freelist: Vec<u32>,
    stores: HashMap<TypeId, StoreEntry>,
}

impl Registry {
    /// Create a registry able to hold up to `capacity` simultaneous entities.
    pub fn with_capacity(capacity: usize) -> Self {
        let freelist = (0..capacity as u32).rev().collect();
        Self {
            capacity,
            alive: vec![false; capacity],
            alive_count: 0,
            freelist,
            stores: HashMap::new(),
        }
    }

    /// The maximum number of simultaneous entities.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of currently live entities.
    pub fn alive_count(&self) -> usize {
        self.alive_count
    }

    /// Register a component type under `name`, creating its store.
    ///
    /// Registering the same type twice is a no-op. Reusing a name for a
    /// different type panics: names must identify exactly one type.
    pub fn register<T: 'static>(&mut self, name: &str) {
        let type_id = TypeId::of::<T>();
        if self.stores.contains_key(&type_id) {
            return;
        }
        if self.stores.values().any(|entry| entry.name == name) {
            panic!("component name '{name}' is already registered for a different type");
        }
        self.stores.insert(
            type_id,
            StoreEntry {
                name: name.to_owned(),
                store: Box::new(SparseSet::<T>::with_capacity(self.capacity)),
            },
        );
    }

    /// Allocate a fresh entity with no components attached.
    ///
    /// Fails with [`EcsError::Exhausted`] once `capacity` entities are live.
    pub fn spawn(&mut self) -> Result<Entity, EcsError> {
        let index = self.freelist.pop().ok_or(EcsError::Exhausted {
            capacity: self.capacity,
        })?;
        self.alive[index as usize] = true;
        self.alive_count += 1;
        Ok(Entity::from_index(index))
    }

    /// Despawn `entity`, erasing it from every component store.
    ///
    /// Returns `false` (benign no-op) if the entity is not currently live.
    /// The freed id goes back on the freelist and will be reused by the next
    /// spawn.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        let index = entity.index();
        if index >= self.capacity || !self.alive[index] {
            tracing::debug!(%entity, "despawn of non-live entity ignored");
            return false;
        }

        for entry in self.stores.values_mut() {
            entry.store.erase(entity);
        }

        self.alive[index] = false;
        self.alive_count -= 1;
        self.freelist.push(index as u32);
        true
    }

    /// Whether `entity` currently exists (it may still have zero components).
    pub fn contains(&self, entity: Entity) -> bool {
        self.alive.get(entity.index()).copied().unwrap_or(false)
    }

    /// Attach a component value to a live entity.
    pub fn add<T: 'static>(&mut self, entity: Entity, value: T) -> Result<(), EcsError> {
        if !self.contains(entity) {
            return Err(EcsError::NoSuchEntity { entity });
        }
        match self.store_mut::<T>() {
            Some(store) => store.insert(entity, value),
            None => Err(EcsError::UnknownComponent {
                name: type_name::<T>().to_owned(),
                registered: self.registered_names().join(", "),
            }),
        }
    }

    /// Detach `T` from `entity`. Returns `false` if it was not attached.
    pub fn remove<T: 'static>(&mut self, entity: Entity) -> bool {
        match self.store_mut::<T>() {
            Some(store) => store.remove(entity),
            None => false,
        }
    }

    /// Whether `entity` has a `T` attached. Distinct from
    /// [`contains`](Self::contains): an entity can exist with no components.
    pub fn has<T: 'static>(&self, entity: Entity) -> bool {
        self.store::<T>().is_some_and(|s| s.contains(entity))
    }

    /// Borrow `entity`'s `T`, or `None` if absent or the type is unregistered.
    pub fn get<T: 'static>(&self, entity: Entity) -> Option<&T> {
        self.store::<T>()?.get(entity)
    }

    /// Mutably borrow `entity`'s `T`.
    pub fn get_mut<T: 'static>(&mut self, entity: Entity) -> Option<&mut T> {
        self.store_mut::<T>()?.get_mut(entity)
    }

    /// Borrow the whole store for `T`, for iteration.
    pub fn store<T: 'static>(&self) -> Option<&SparseSet<T>> {
        self.stores
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.store.as_any().downcast_ref())
    }

    /// Mutably borrow the whole store for `T`.
    pub fn store_mut<T: 'static>(&mut self) -> Option<&mut SparseSet<T>> {
        self.stores
            .get_mut(&TypeId::of::<T>())
            .and_then(|entry| entry.store.as_any_mut().downcast_mut())
    }

    /// Names of all registered component types, sorted.
    pub fn registered_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.stores.values().map(|e| e.name.clone()).collect();
        names.sort();
        names
    }
}
