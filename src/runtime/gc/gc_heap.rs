use std::{
    collections::{HashMap, VecDeque},
    rc::Rc,
};

use log::{debug, trace};

use crate::runtime::{
    error::{Result, RuntimeError},
    gc::{
        gc_handle::{Handle, RootTable},
        heap_object::{ObjectView, PayloadLimits, Tag, encoded_size, write_object},
        weak_ref::WeakRef,
    },
};

pub const DEFAULT_HEAP_BYTES: usize = 64 * 1024;
const MIN_HEAP_BYTES: usize = 256;

#[derive(Debug, Clone, Copy)]
struct Slot {
    offset: u32,
    generation: u32,
    live: bool,
}

/// Summary of one compaction pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectStats {
    pub live_objects: usize,
    pub reclaimed_objects: usize,
    pub bytes_before: usize,
    pub bytes_after: usize,
}

/// Compacting object heap.
///
/// Objects are appended to a bounded byte arena as `[tag][len][payload]`
/// records. Callers never see arena offsets: every object is reached through
/// a logical slot whose offset is rewritten when the arena is compacted, and
/// payload references between objects are slot numbers as well.
///
/// Collection only runs when an allocation does not fit. It keeps every
/// object pinned by a live [`Handle`] plus everything reachable from those
/// through payload references, copies them into a fresh arena in
/// first-discovery order and releases every other slot. Roots are
/// discovered in the order they sit in the arena.
pub struct GcHeap {
    arena: Vec<u8>,
    capacity: usize,
    slots: Vec<Slot>,
    free_slots: Vec<u32>,
    roots: Rc<RootTable>,
    limits: PayloadLimits,
    gc_enabled: bool,
    collecting: bool,
    total_collections: usize,
    total_allocations: usize,
    /// Weakly-held shared objects keyed by their encoded payload.
    pub(crate) interned: HashMap<(Tag, Vec<u8>), WeakRef>,
}

impl Default for GcHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl GcHeap {
    /// Creates a heap with the default arena size.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HEAP_BYTES)
    }

    /// Creates a heap whose arena holds at most `bytes` bytes of objects.
    ///
    /// Values below 256 bytes are clamped upward.
    pub fn with_capacity(bytes: usize) -> Self {
        let capacity = bytes.max(MIN_HEAP_BYTES);
        Self {
            arena: Vec::with_capacity(capacity),
            capacity,
            slots: Vec::new(),
            free_slots: Vec::new(),
            roots: Rc::new(RootTable::default()),
            limits: PayloadLimits::default(),
            gc_enabled: true,
            collecting: false,
            total_collections: 0,
            total_allocations: 0,
            interned: HashMap::new(),
        }
    }

    /// Enables or disables collection on allocation failure.
    ///
    /// With collection disabled an allocation that does not fit fails with
    /// `OutOfMemory` immediately.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.gc_enabled = enabled;
    }

    pub fn set_limits(&mut self, limits: PayloadLimits) {
        self.limits = limits;
    }

    pub fn limits(&self) -> PayloadLimits {
        self.limits
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes currently occupied in the arena, garbage included.
    pub fn used_bytes(&self) -> usize {
        self.arena.len()
    }

    pub fn free_bytes(&self) -> usize {
        self.capacity - self.arena.len()
    }

    /// Returns the number of slots holding an object (reachable or not).
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.live).count()
    }

    /// Number of handles currently registered as roots.
    pub fn root_count(&self) -> usize {
        self.roots.total()
    }

    pub fn total_allocations(&self) -> usize {
        self.total_allocations
    }

    pub fn total_collections(&self) -> usize {
        self.total_collections
    }

    /// Allocates a new object and returns an owning handle to it.
    ///
    /// When the arena is full this collects once and retries. The allocation
    /// either fully succeeds or leaves the heap untouched apart from the
    /// collection.
    pub fn alloc(&mut self, tag: Tag, payload: &[u8]) -> Result<Handle> {
        debug_assert!(!self.collecting, "GcHeap::alloc: allocation during collection");
        let max = tag.max_payload(&self.limits);
        if payload.len() > max {
            return Err(RuntimeError::ObjectTooLarge {
                type_name: tag.type_name(),
                len: payload.len(),
                max,
            });
        }
        debug_assert!(
            ObjectView {
                tag,
                payload
            }
            .references()
            .all(|slot| self.is_live(slot)),
            "GcHeap::alloc: payload references a dead slot"
        );

        let size = encoded_size(payload.len());
        if size > self.free_bytes() {
            if self.gc_enabled {
                trace!(
                    "gc: {} bytes requested with {} free, collecting",
                    size,
                    self.free_bytes()
                );
                self.collect();
            }
            if size > self.free_bytes() {
                return Err(RuntimeError::OutOfMemory {
                    requested: size,
                    available: self.free_bytes(),
                });
            }
        }

        let offset = self.arena.len() as u32;
        write_object(&mut self.arena, tag, payload);
        self.total_allocations += 1;

        let slot = match self.free_slots.pop() {
            Some(slot) => {
                let entry = &mut self.slots[slot as usize];
                entry.offset = offset;
                entry.live = true;
                slot
            }
            None => {
                let slot = self.slots.len() as u32;
                self.slots.push(Slot {
                    offset,
                    generation: 0,
                    live: true,
                });
                slot
            }
        };
        Ok(Handle::new(slot, Rc::clone(&self.roots)))
    }

    /// Returns the tag and payload of the object behind `handle`.
    ///
    /// Panics if the handle belongs to another heap.
    pub fn view(&self, handle: &Handle) -> ObjectView<'_> {
        assert!(
            handle.belongs_to(&self.roots),
            "GcHeap::view: handle belongs to another heap"
        );
        self.view_slot(handle.slot())
    }

    /// Returns the payload of `handle`, which must carry `tag`.
    ///
    /// A mismatch is an engine bug, not a user error, and panics.
    pub fn expect(&self, handle: &Handle, tag: Tag) -> &[u8] {
        let view = self.view(handle);
        assert!(
            view.tag == tag,
            "GcHeap::expect: slot {} holds {:?}, expected {:?}",
            handle.slot(),
            view.tag,
            tag
        );
        view.payload
    }

    pub fn tag(&self, handle: &Handle) -> Tag {
        self.view(handle).tag
    }

    pub(crate) fn view_slot(&self, slot: u32) -> ObjectView<'_> {
        let entry = self
            .slots
            .get(slot as usize)
            .filter(|entry| entry.live)
            .unwrap_or_else(|| panic!("GcHeap::view_slot: slot {slot} is not live"));
        ObjectView::read(&self.arena, entry.offset as usize)
            .map(|(view, _)| view)
            .unwrap_or_else(|| panic!("GcHeap::view_slot: corrupt object in slot {slot}"))
    }

    fn is_live(&self, slot: u32) -> bool {
        self.slots
            .get(slot as usize)
            .is_some_and(|entry| entry.live)
    }

    /// Creates a weak reference that does not keep the object alive.
    pub fn downgrade(&self, handle: &Handle) -> WeakRef {
        let entry = self.slots[handle.slot() as usize];
        WeakRef {
            slot: handle.slot(),
            generation: entry.generation,
        }
    }

    /// Re-resolves a weak reference, yielding `None` once its object has been
    /// collected.
    pub fn upgrade(&self, weak: &WeakRef) -> Option<Handle> {
        let entry = self.slots.get(weak.slot as usize)?;
        if entry.live && entry.generation == weak.generation {
            Some(Handle::new(weak.slot, Rc::clone(&self.roots)))
        } else {
            None
        }
    }

    /// Runs a full compaction.
    ///
    /// Not reentrant: nothing may allocate while it runs, which the `&mut`
    /// receiver guarantees for safe callers.
    pub fn collect(&mut self) -> CollectStats {
        assert!(!self.collecting, "GcHeap::collect: collection is not reentrant");
        self.collecting = true;

        let bytes_before = self.arena.len();
        let mut marked = vec![false; self.slots.len()];
        let mut order = Vec::new();
        let mut queue = VecDeque::new();

        // Slot numbers are reused, so roots are visited in arena order.
        let mut roots: Vec<u32> = self
            .roots
            .rooted_slots()
            .into_iter()
            .filter(|&slot| self.is_live(slot))
            .collect();
        roots.sort_by_key(|&slot| self.slots[slot as usize].offset);

        for slot in roots {
            let idx = slot as usize;
            if !marked[idx] {
                marked[idx] = true;
                order.push(slot);
                queue.push_back(slot);
            }
        }

        while let Some(slot) = queue.pop_front() {
            for child in self.view_slot(slot).references() {
                let idx = child as usize;
                if !marked[idx] {
                    marked[idx] = true;
                    order.push(child);
                    queue.push_back(child);
                }
            }
        }

        let mut compacted = Vec::with_capacity(self.capacity);
        for &slot in &order {
            let offset = self.slots[slot as usize].offset as usize;
            let size = ObjectView::read(&self.arena, offset)
                .map(|(_, size)| size)
                .unwrap_or_else(|| panic!("GcHeap::collect: corrupt object in slot {slot}"));
            let new_offset = compacted.len() as u32;
            compacted.extend_from_slice(&self.arena[offset..offset + size]);
            self.slots[slot as usize].offset = new_offset;
        }

        let mut reclaimed = 0;
        for (idx, entry) in self.slots.iter_mut().enumerate() {
            if entry.live && !marked[idx] {
                entry.live = false;
                entry.generation = entry.generation.wrapping_add(1);
                self.free_slots.push(idx as u32);
                reclaimed += 1;
            }
        }

        self.arena = compacted;
        let slots = &self.slots;
        self.interned.retain(|_, weak| {
            slots
                .get(weak.slot as usize)
                .is_some_and(|entry| entry.live && entry.generation == weak.generation)
        });

        self.total_collections += 1;
        self.collecting = false;

        let stats = CollectStats {
            live_objects: order.len(),
            reclaimed_objects: reclaimed,
            bytes_before,
            bytes_after: self.arena.len(),
        };
        debug!(
            "gc: kept {} objects, reclaimed {}, {} -> {} bytes",
            stats.live_objects, stats.reclaimed_objects, stats.bytes_before, stats.bytes_after
        );
        stats
    }
}
