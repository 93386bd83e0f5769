//! Registry of live dictionaries, walked by diagnostics.

use std::{
    cell::RefCell,
    fmt::{self, Debug, Formatter},
    rc::{Rc, Weak},
};

use tracing::debug;

use crate::{
    common::{DictionaryStats, Topology},
    comparator::Comparator,
    Dictionary,
};

/// Identifies one registration inside a [Registry].
pub(crate) type RegistrationId = u64;

struct Registration {
    id: RegistrationId,
    topology: Weak<RefCell<Topology>>,
}

#[derive(Default)]
struct Inner {
    next_id: RegistrationId,
    registrations: Vec<Registration>,
}

#[derive(Clone, Default)]
/// Every live [Dictionary] created in this registry, in creation order.
///
/// Cloning a registry is cheap and yields another handle to the same set.
/// The registry only observes the shape of each dictionary, it never keeps a
/// dictionary alive: dropping or destroying one removes it from here.
pub struct Registry {
    inner: Rc<RefCell<Inner>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // === Getters ===

    /// Number of live dictionaries.
    pub fn len(&self) -> usize {
        self.live().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names of the live dictionaries, in creation order.
    pub fn names(&self) -> Vec<String> {
        self.live()
            .iter()
            .map(|topology| topology.borrow().name().to_string())
            .collect()
    }

    // === Public Methods ===

    /// Create an empty dictionary registered here.
    pub fn create<K, V>(&self, name: &str, comparator: Comparator<K>) -> Dictionary<K, V> {
        Dictionary::new(self, name, comparator)
    }

    /// Statistics of every live dictionary, in creation order.
    pub fn statistics(&self) -> Vec<DictionaryStats> {
        self.live()
            .iter()
            .map(|topology| topology.borrow().statistics())
            .collect()
    }

    /// Emit one [Dictionary::stats] line per live dictionary.
    pub fn stats_walk<F>(&self, mut emit: F)
    where
        F: FnMut(&str),
    {
        // Collected first, so `emit` is free to create or drop dictionaries.
        for stats in self.statistics() {
            emit(&stats.to_string());
        }
    }

    // === Crate Methods ===

    pub(crate) fn register(&self, topology: &Rc<RefCell<Topology>>) -> RegistrationId {
        let mut inner = self.inner.borrow_mut();

        inner
            .registrations
            .retain(|registration| registration.topology.strong_count() > 0);

        let id = inner.next_id;
        inner.next_id += 1;
        inner.registrations.push(Registration {
            id,
            topology: Rc::downgrade(topology),
        });

        debug!(
            name = %topology.borrow().name(),
            live = inner.registrations.len(),
            "Registered dictionary"
        );

        id
    }

    pub(crate) fn deregister(&self, id: RegistrationId) {
        self.inner
            .borrow_mut()
            .registrations
            .retain(|registration| registration.id != id);
    }

    // === Private Methods ===

    fn live(&self) -> Vec<Rc<RefCell<Topology>>> {
        self.inner
            .borrow()
            .registrations
            .iter()
            .filter_map(|registration| registration.topology.upgrade())
            .collect()
    }
}

impl Debug for Registry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("dictionaries", &self.names())
            .finish()
    }
}
