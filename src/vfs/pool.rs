//! Index-addressed node storage with slot recycling.

use std::collections::TryReserveError;
use std::ops::{Index, IndexMut};

/// Handle of a node in a [`Pool`].
///
/// The generation distinguishes the current occupant of a slot from earlier ones,
/// so a handle kept past `release()` never aliases a recycled node.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    index: usize,
    generation: u32,
}

#[cfg(test)]
impl Key {
    pub(crate) fn index(self) -> usize {
        self.index
    }
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

pub(crate) struct Pool<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    len: usize,
}

impl<T> Pool<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Stores `value` in a free slot, growing the pool if none is left.
    /// Nothing is changed if memory cannot be obtained.
    pub fn try_insert(&mut self, value: T) -> Result<Key, TryReserveError> {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.value = Some(value);
            self.len += 1;
            return Ok(Key {
                index,
                generation: slot.generation,
            });
        }

        // The free list must be able to take back every slot without allocating,
        // so release() stays infallible.
        self.slots.try_reserve(1)?;
        let wanted = self.slots.len() + 1;
        self.free.try_reserve(wanted - self.free.len())?;

        let index = self.slots.len();
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        self.len += 1;
        Ok(Key {
            index,
            generation: 0,
        })
    }

    pub fn get(&self, key: Key) -> Option<&T> {
        self.slots
            .get(key.index)
            .filter(|slot| slot.generation == key.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn get_mut(&mut self, key: Key) -> Option<&mut T> {
        self.slots
            .get_mut(key.index)
            .filter(|slot| slot.generation == key.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    pub fn contains(&self, key: Key) -> bool {
        self.get(key).is_some()
    }

    /// Takes the node out and returns its slot to the free list.
    pub fn release(&mut self, key: Key) -> Option<T> {
        let slot = self
            .slots
            .get_mut(key.index)
            .filter(|slot| slot.generation == key.generation)?;
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(key.index);
        self.len -= 1;
        Some(value)
    }
}

impl<T> Index<Key> for Pool<T> {
    type Output = T;

    fn index(&self, key: Key) -> &T {
        self.get(key).expect("stale pool key")
    }
}

impl<T> IndexMut<Key> for Pool<T> {
    fn index_mut(&mut self, key: Key) -> &mut T {
        self.get_mut(key).expect("stale pool key")
    }
}
