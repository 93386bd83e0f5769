//! Splay-tree ordered dictionary.

use std::{
    cell::RefCell,
    cmp::Ordering,
    fmt::{self, Debug, Formatter},
    mem,
    rc::Rc,
};

use tracing::{debug, trace, warn};

use crate::{
    common::{DictionaryStats, Element, ElementRef, Entry, NodeId, Slab, Topology},
    comparator::Comparator,
    config::Config,
    cursor::{Cursor, Iter},
    registry::{Registry, RegistrationId},
    Error, Result,
};

/// An ordered dictionary backed by a splay tree.
///
/// Every lookup retunes the tree so recently used keys sit near the root,
/// giving amortized `O(log n)` operations without balance metadata. The same
/// elements are also threaded on a doubly linked list in ascending key order,
/// which is what iteration walks.
///
/// Lookups take `&self`: the retune only rearranges tree links, never the
/// list, keys or values, so it is kept behind interior mutability.
///
/// ```
/// use splay_dict::{comparator, Dictionary, Registry};
///
/// let registry = Registry::new();
/// let mut dict = Dictionary::new(&registry, "numbers", comparator::natural);
///
/// for key in [5, 3, 8, 1, 4].iter() {
///     dict.add(*key, key * 10);
/// }
/// dict.delete(&3);
///
/// assert_eq!(dict.keys().copied().collect::<Vec<_>>(), vec![1, 4, 5, 8]);
/// assert_eq!(dict.retrieve(&8), Some(&80));
/// assert_eq!(dict.linear_index(&8), Some(3));
/// ```
pub struct Dictionary<K, V> {
    name: String,
    comparator: Comparator<K>,
    topology: Rc<RefCell<Topology>>,
    slab: Slab<K, V>,
    registry: Registry,
    registration: RegistrationId,
}

impl<K, V> Dictionary<K, V> {
    /// Create an empty dictionary named `name` and register it in `registry`.
    pub fn new(registry: &Registry, name: &str, comparator: Comparator<K>) -> Self {
        Self::with_config(
            registry,
            Config {
                name: name.to_string(),
                ..Config::default()
            },
            comparator,
        )
    }

    /// Create an empty dictionary from a [Config].
    pub fn with_config(registry: &Registry, config: Config, comparator: Comparator<K>) -> Self {
        let topology = Rc::new(RefCell::new(Topology::new(&config.name, config.capacity)));
        let registration = registry.register(&topology);

        trace!(name = %config.name, capacity = config.capacity, "Dictionary created");

        Dictionary {
            name: config.name,
            comparator,
            topology,
            slab: Slab::with_capacity(config.capacity),
            registry: registry.clone(),
            registration,
        }
    }

    // === Getters ===

    /// Display name of this dictionary.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the comparator currently ordering the keys.
    pub fn comparator(&self) -> Comparator<K> {
        self.comparator
    }

    /// Replace the comparator.
    ///
    /// Existing elements are not reordered, so the new comparator must agree
    /// with the old one on every key already stored.
    pub fn set_comparator(&mut self, comparator: Comparator<K>) {
        self.comparator = comparator;
    }

    /// Number of elements in this dictionary.
    pub fn size(&self) -> usize {
        self.topology.borrow().count()
    }

    /// Same as [Self::size].
    pub fn len(&self) -> usize {
        self.size()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    // === Public Methods ===

    /// Insert `value` under `key` and return a view of the stored element.
    ///
    /// If an equal key is already present the element is updated in place:
    /// both its key and value are replaced, the old pair is dropped, and
    /// existing [ElementRef]s to it stay valid. Use [Self::insert] to get the
    /// displaced value back, or [Self::try_add] to refuse duplicates.
    pub fn add(&mut self, key: K, value: V) -> Element<'_, K, V> {
        let (id, _) = self.link(key, value);

        self.element(id)
    }

    /// Insert `value` under `key`, returning the value it displaced, if any.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let (_, displaced) = self.link(key, value);

        displaced.map(|entry| entry.value)
    }

    /// Insert `value` under `key` only if the key is absent.
    pub fn try_add(&mut self, key: K, value: V) -> Result<Element<'_, K, V>> {
        if self.contains(&key) {
            warn!(name = %self.name, "Refusing to add a duplicate key");

            return Err(Error::DuplicateKey(self.name.clone()));
        }

        Ok(self.add(key, value))
    }

    /// Look up `key`, moving it to the root of the tree.
    pub fn find(&self, key: &K) -> Option<Element<'_, K, V>> {
        self.locate(key).map(|id| self.element(id))
    }

    /// Returns the value bound to `key`.
    pub fn retrieve(&self, key: &K) -> Option<&V> {
        self.locate(key).map(|id| &self.slab[id].value)
    }

    /// Returns a mutable reference to the value bound to `key`.
    pub fn retrieve_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.locate(key)?;

        Some(&mut self.slab[id].value)
    }

    /// Returns `true` if `key` is present.
    pub fn contains(&self, key: &K) -> bool {
        self.locate(key).is_some()
    }

    /// Remove `key`, handing its value back to the caller.
    pub fn delete(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Remove `key`, handing both the stored key and value back to the caller.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let id = self.locate(key)?;

        self.unlink(id)
    }

    /// Remove the element behind `handle`.
    pub fn remove_element(&mut self, handle: ElementRef) -> Result<(K, V)> {
        let stale = Error::StaleElement {
            index: handle.index,
            generation: handle.generation,
        };

        let id = match self.slab.resolve(handle) {
            Some(id) => id,
            None => return Err(stale),
        };

        let comparator = self.comparator;
        let slab = &self.slab;
        let mut topology = self.topology.borrow_mut();

        topology.retune(|n| comparator(&slab[id].key, &slab[n].key));

        if topology.root() != Some(id) {
            // Only reachable if the comparator was swapped for an inconsistent one.
            warn!(name = %self.name, ?handle, "Element is not reachable through the tree");

            return Err(stale);
        }
        drop(topology);

        self.unlink(id).ok_or(stale)
    }

    /// Zero-based ascending rank of `key`.
    ///
    /// The first call after any insert or delete rebuilds every element's
    /// cached rank in one pass over the list, later calls read the cache.
    pub fn linear_index(&self, key: &K) -> Option<usize> {
        let id = self.locate(key)?;

        Some(self.topology.borrow_mut().position(id))
    }

    /// Returns the element behind `handle`, if it is still alive.
    pub fn get(&self, handle: ElementRef) -> Option<Element<'_, K, V>> {
        self.slab.resolve(handle).map(|id| self.element(id))
    }

    /// Returns the key behind `handle`.
    pub fn key(&self, handle: ElementRef) -> Option<&K> {
        self.get(handle).map(|element| element.key())
    }

    /// Returns the value behind `handle`.
    pub fn value(&self, handle: ElementRef) -> Option<&V> {
        self.get(handle).map(|element| element.value())
    }

    /// Returns a mutable reference to the value behind `handle`.
    pub fn value_mut(&mut self, handle: ElementRef) -> Option<&mut V> {
        let id = self.slab.resolve(handle)?;

        self.slab.get_mut(id).map(|entry| &mut entry.value)
    }

    /// Smallest element.
    pub fn first(&self) -> Option<Element<'_, K, V>> {
        self.head_id().map(|id| self.element(id))
    }

    /// Largest element.
    pub fn last(&self) -> Option<Element<'_, K, V>> {
        self.tail_id().map(|id| self.element(id))
    }

    /// Call `visit` once for every element, in ascending key order.
    ///
    /// The successor of each element is captured before `visit` runs on it,
    /// so `visit` may delete the element it was handed. If it deletes that
    /// captured successor instead, the walk ends there.
    pub fn foreach<F>(&mut self, mut visit: F)
    where
        F: FnMut(&mut Self, ElementRef),
    {
        let mut current = self.head_handle();

        while let Some(handle) = current.filter(|h| self.slab.resolve(*h).is_some()) {
            let next = self.next_handle(handle);
            visit(self, handle);
            current = next;
        }
    }

    /// Same walk as [Self::foreach], stopping at the first `Some` returned by
    /// `visit`.
    pub fn search<F, R>(&mut self, mut visit: F) -> Option<R>
    where
        F: FnMut(&mut Self, ElementRef) -> Option<R>,
    {
        let mut current = self.head_handle();

        while let Some(handle) = current.filter(|h| self.slab.resolve(*h).is_some()) {
            let next = self.next_handle(handle);

            if let Some(found) = visit(self, handle) {
                return Some(found);
            }
            current = next;
        }

        None
    }

    /// Iterator over `(&key, &value)` in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self)
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Values in ascending key order.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + '_ {
        self.iter().map(|(_, value)| value)
    }

    /// Stateful cursor positioned on the smallest element.
    pub fn cursor(&self) -> Cursor {
        Cursor::start(self)
    }

    /// Emit one formatted statistics line for this dictionary.
    pub fn stats<F>(&self, mut emit: F)
    where
        F: FnMut(&str),
    {
        emit(&self.statistics().to_string());
    }

    /// Size and depth statistics of the tree as it is shaped right now.
    pub fn statistics(&self) -> DictionaryStats {
        self.topology.borrow().statistics()
    }

    /// Remove every element, dropping keys and values.
    pub fn clear(&mut self) {
        self.topology.borrow_mut().clear();
        self.slab.clear();
    }

    /// Tear this dictionary down, handing every element to `release` in
    /// ascending key order, then deregister it.
    ///
    /// Dropping a dictionary is the same as destroying it without a callback.
    pub fn destroy<F>(mut self, mut release: F)
    where
        F: FnMut(K, V),
    {
        let count = self.size();
        let mut current = self.head_id();

        while let Some(id) = current {
            current = self.topology.borrow().next(id);

            if let Some(Entry { key, value }) = self.slab.remove(id) {
                release(key, value);
            }
        }

        self.clear();

        trace!(name = %self.name, count, "Dictionary destroyed");
    }

    // === Crate Methods ===

    pub(crate) fn head_id(&self) -> Option<NodeId> {
        self.topology.borrow().head()
    }

    pub(crate) fn tail_id(&self) -> Option<NodeId> {
        self.topology.borrow().tail()
    }

    pub(crate) fn next_id(&self, id: NodeId) -> Option<NodeId> {
        self.topology.borrow().next(id)
    }

    pub(crate) fn prev_id(&self, id: NodeId) -> Option<NodeId> {
        self.topology.borrow().prev(id)
    }

    pub(crate) fn entry(&self, id: NodeId) -> (&K, &V) {
        let entry = &self.slab[id];

        (&entry.key, &entry.value)
    }

    pub(crate) fn head_handle(&self) -> Option<ElementRef> {
        self.head_id().map(|id| self.slab.handle(id))
    }

    /// Handle of the element after `handle` in key order.
    pub(crate) fn next_handle(&self, handle: ElementRef) -> Option<ElementRef> {
        let id = self.slab.resolve(handle)?;

        self.next_id(id).map(|next| self.slab.handle(next))
    }

    pub(crate) fn is_live(&self, handle: ElementRef) -> bool {
        self.slab.resolve(handle).is_some()
    }

    // === Private Methods ===

    /// Retune on `key` and return the root if it holds an equal key.
    fn locate(&self, key: &K) -> Option<NodeId> {
        let comparator = self.comparator;
        let slab = &self.slab;
        let mut topology = self.topology.borrow_mut();

        topology.retune(|n| comparator(key, &slab[n].key));

        topology
            .root()
            .filter(|root| comparator(key, &slab[*root].key) == Ordering::Equal)
    }

    /// Store the pair and link it, merging into an existing equal key.
    fn link(&mut self, key: K, value: V) -> (NodeId, Option<Entry<K, V>>) {
        let id = self.slab.insert(key, value);

        let comparator = self.comparator;
        let slab = &self.slab;
        let linked = self
            .topology
            .borrow_mut()
            .link(id, |n| comparator(&slab[id].key, &slab[n].key));

        match linked {
            Ok(()) => (id, None),
            Err(existing) => {
                debug!(name = %self.name, "Duplicate key merged in place");

                match self.slab.remove(id) {
                    Some(duplicate) => {
                        let previous = mem::replace(&mut self.slab[existing], duplicate);
                        (existing, Some(previous))
                    }
                    None => (existing, None),
                }
            }
        }
    }

    /// Unlink `id`, which must be the current root.
    fn unlink(&mut self, id: NodeId) -> Option<(K, V)> {
        let removed = self.topology.borrow_mut().unlink_root();
        debug_assert_eq!(removed, Some(id));

        self.slab
            .remove(id)
            .map(|Entry { key, value }| (key, value))
    }

    fn element(&self, id: NodeId) -> Element<'_, K, V> {
        let entry = &self.slab[id];

        Element::new(self.slab.handle(id), &entry.key, &entry.value)
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let topology = self.topology.borrow();
        let list = topology.list();

        assert_eq!(topology.in_order(), list);
        assert_eq!(list.len(), topology.count());

        for pair in list.windows(2) {
            assert_eq!(
                (self.comparator)(&self.slab[pair[0]].key, &self.slab[pair[1]].key),
                Ordering::Less
            );
        }
    }
}

impl<K, V> Drop for Dictionary<K, V> {
    fn drop(&mut self) {
        self.registry.deregister(self.registration);
    }
}

impl<K: Debug, V: Debug> Debug for Dictionary<K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Dictionary({:?}) ", self.name)?;

        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V> IntoIterator for &'a Dictionary<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
