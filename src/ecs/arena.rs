//! Generational arena with a free-list
//!
//! Entities are addressed by `Handle` (slot index + generation). Removing an
//! entity frees its slot for reuse without shifting any other slot, so an
//! index-based pass over the arena stays valid while entities die during it.
//! A stale handle (slot reused since) never resolves.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Stable reference to an arena slot
    pub struct Handle;
}

#[derive(Debug, Clone)]
pub struct Arena<T> {
    slots: SlotMap<Handle, T>,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            slots: SlotMap::with_key(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn insert(&mut self, value: T) -> Handle {
        self.slots.insert(value)
    }

    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        self.slots.remove(handle)
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.slots.get(handle)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.slots.get_mut(handle)
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.slots.contains_key(handle)
    }

    /// Handles of all occupied slots, in slot order
    ///
    /// A snapshot, so the arena can be mutated while walking it.
    pub fn handles(&self) -> Vec<Handle> {
        self.slots.keys().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> + '_ {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle, &mut T)> + '_ {
        self.slots.iter_mut()
    }

    /// Free every slot whose value fails `keep`; returns how many were freed
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) -> usize {
        let before = self.slots.len();
        self.slots.retain(|_, value| keep(value));
        before - self.slots.len()
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}
