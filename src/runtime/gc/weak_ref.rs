/// Weak (back) reference to a heap object.
///
/// Records the object's slot and the slot's generation at creation time. It
/// never pins the object: once a collection reclaims the slot, the generation
/// moves on and [`GcHeap::upgrade`](super::GcHeap::upgrade) yields `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeakRef {
    pub(crate) slot: u32,
    pub(crate) generation: u32,
}

impl WeakRef {
    pub fn slot(self) -> u32 {
        self.slot
    }
}
