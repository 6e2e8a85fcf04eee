use std::{
    cell::RefCell,
    fmt,
    hash::{Hash, Hasher},
    rc::Rc,
};

/// Per-slot root counts shared between a heap and every handle it minted.
///
/// A slot with a non-zero count is a collection root.
#[derive(Debug, Default)]
pub(crate) struct RootTable {
    counts: RefCell<Vec<u32>>,
}

impl RootTable {
    pub(crate) fn retain(&self, slot: u32) {
        let mut counts = self.counts.borrow_mut();
        let idx = slot as usize;
        if idx >= counts.len() {
            counts.resize(idx + 1, 0);
        }
        counts[idx] += 1;
    }

    pub(crate) fn release(&self, slot: u32) {
        let mut counts = self.counts.borrow_mut();
        match counts.get_mut(slot as usize) {
            Some(count) if *count > 0 => *count -= 1,
            _ => panic!("RootTable::release: slot {slot} has no registered handle"),
        }
    }

    pub(crate) fn count(&self, slot: u32) -> u32 {
        self.counts
            .borrow()
            .get(slot as usize)
            .copied()
            .unwrap_or(0)
    }

    /// Slots currently pinned by at least one handle, in ascending order.
    pub(crate) fn rooted_slots(&self) -> Vec<u32> {
        self.counts
            .borrow()
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(slot, _)| slot as u32)
            .collect()
    }

    pub(crate) fn total(&self) -> usize {
        self.counts.borrow().iter().map(|c| *c as usize).sum()
    }
}

/// Owning handle into the object heap.
///
/// A `Handle` names a logical slot, never an arena offset, so it stays valid
/// across compaction. Each live handle (including every clone) counts as a
/// collection root for its object; dropping the last one makes the object
/// eligible for reclamation at the next collection.
///
/// Handles compare and hash by object identity (the slot), which is stable
/// for the object's whole lifetime.
pub struct Handle {
    slot: u32,
    roots: Rc<RootTable>,
}

impl Handle {
    pub(crate) fn new(slot: u32, roots: Rc<RootTable>) -> Self {
        roots.retain(slot);
        Self { slot, roots }
    }

    /// Returns the logical slot index backing this handle.
    pub fn slot(&self) -> u32 {
        self.slot
    }

    /// Number of live handles (this one included) pinning the same object.
    pub fn root_count(&self) -> u32 {
        self.roots.count(self.slot)
    }

    pub(crate) fn belongs_to(&self, roots: &Rc<RootTable>) -> bool {
        Rc::ptr_eq(&self.roots, roots)
    }
}

impl Clone for Handle {
    fn clone(&self) -> Self {
        Self::new(self.slot, Rc::clone(&self.roots))
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        self.roots.release(self.slot);
    }
}

impl PartialEq for Handle {
    fn eq(&self, other: &Self) -> bool {
        self.slot == other.slot && Rc::ptr_eq(&self.roots, &other.roots)
    }
}

impl Eq for Handle {}

impl Hash for Handle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.slot.hash(state);
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&self.slot).finish()
    }
}
