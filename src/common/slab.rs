//! Generational storage for dictionary payloads.

use std::ops::{Index, IndexMut};

use crate::common::{ElementRef, NodeId};

#[derive(Debug)]
pub(crate) struct Entry<K, V> {
    pub key: K,
    pub value: V,
}

#[derive(Debug)]
struct Slot<K, V> {
    generation: u32,
    entry: Option<Entry<K, V>>,
}

/// Key/value storage indexed by [NodeId], with a free list for reuse.
///
/// Each slot's generation is bumped on removal, so stale [ElementRef]s can be
/// told apart from whatever takes the slot next.
#[derive(Debug)]
pub(crate) struct Slab<K, V> {
    slots: Vec<Slot<K, V>>,
    free: Vec<NodeId>,
}

impl<K, V> Slab<K, V> {
    pub fn with_capacity(capacity: usize) -> Self {
        Slab {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    pub fn insert(&mut self, key: K, value: V) -> NodeId {
        let entry = Some(Entry { key, value });

        match self.free.pop() {
            Some(index) => {
                self.slots[index].entry = entry;
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    entry,
                });
                self.slots.len() - 1
            }
        }
    }

    pub fn remove(&mut self, index: NodeId) -> Option<Entry<K, V>> {
        let slot = self.slots.get_mut(index)?;
        let entry = slot.entry.take()?;

        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);

        Some(entry)
    }

    pub fn get(&self, index: NodeId) -> Option<&Entry<K, V>> {
        self.slots.get(index).and_then(|slot| slot.entry.as_ref())
    }

    pub fn get_mut(&mut self, index: NodeId) -> Option<&mut Entry<K, V>> {
        self.slots.get_mut(index).and_then(|slot| slot.entry.as_mut())
    }

    /// Handle for a live slot.
    pub fn handle(&self, index: NodeId) -> ElementRef {
        let generation = self.slots.get(index).map_or(0, |slot| slot.generation);

        ElementRef::new(index, generation)
    }

    /// Resolve a handle back to its slot, if the element is still alive.
    pub fn resolve(&self, handle: ElementRef) -> Option<NodeId> {
        self.slots
            .get(handle.index)
            .filter(|slot| slot.generation == handle.generation && slot.entry.is_some())
            .map(|_| handle.index)
    }

    /// Vacate every slot, invalidating all outstanding handles.
    pub fn clear(&mut self) {
        self.free.clear();

        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.entry.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free.push(index);
        }
    }
}

impl<K, V> Index<NodeId> for Slab<K, V> {
    type Output = Entry<K, V>;

    /// Panics on a vacant slot. Only ids taken from the topology are used here,
    /// and the topology never links a vacant slot.
    fn index(&self, index: NodeId) -> &Self::Output {
        self.get(index).expect("node id linked into the topology must be occupied")
    }
}

impl<K, V> IndexMut<NodeId> for Slab<K, V> {
    fn index_mut(&mut self, index: NodeId) -> &mut Self::Output {
        self.get_mut(index)
            .expect("node id linked into the topology must be occupied")
    }
}
