//! Arena scratch storage for building trees without recursion.
//!
//! The parser lays out contexts in a `NodeArena` as it discovers them, then
//! assembles the final `Arc`-linked tree bottom-up. A parent is always
//! allocated before any of its children, so walking ids in descending order
//! visits every child before its parent.

use std::fmt;

/// Dense identifier of an arena slot.
///
/// Ordering is by allocation order.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArenaNodeId(u32);

impl ArenaNodeId {
    /// Returns the raw `u32` index.
    #[inline]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    #[inline]
    fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ArenaNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArenaNodeId({})", self.0)
    }
}

/// Contiguous slot storage. Slots can be taken out once.
#[derive(Debug, Clone)]
pub struct NodeArena<T> {
    slots: Vec<Option<T>>,
}

impl<T> NodeArena<T> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Stores `data` in a fresh slot.
    pub fn allocate(&mut self, data: T) -> ArenaNodeId {
        let idx = self.slots.len() as u32;
        self.slots.push(Some(data));
        ArenaNodeId(idx)
    }

    /// Returns a mutable reference to the data at `id`, if still present.
    pub fn get_mut(&mut self, id: ArenaNodeId) -> Option<&mut T> {
        self.slots.get_mut(id.index()).and_then(|slot| slot.as_mut())
    }

    /// Moves the data out of its slot, leaving the slot empty.
    pub fn take(&mut self, id: ArenaNodeId) -> Option<T> {
        self.slots.get_mut(id.index()).and_then(|slot| slot.take())
    }

    /// Number of slots ever allocated.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All ids, most recently allocated first.
    pub fn ids_rev(&self) -> impl Iterator<Item = ArenaNodeId> {
        (0..self.slots.len() as u32).rev().map(ArenaNodeId)
    }
}

impl<T> Default for NodeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
