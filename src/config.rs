use crate::{
    comparator::{self, Comparator},
    Dictionary, Registry,
};

/// Default display name, used when none is configured.
pub const DEFAULT_NAME: &str = "dictionary";

#[derive(Debug, Clone)]
/// Dictionary Configurations
pub struct Config {
    /// Display name reported by [Dictionary::stats] and [Registry::stats_walk].
    ///
    /// Defaults to [DEFAULT_NAME]
    pub name: String,
    /// Number of element slots to allocate up front.
    ///
    /// Dictionaries grow on demand, this only avoids reallocation for
    /// collections whose size is known in advance.
    ///
    /// Defaults to `0`
    pub capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            capacity: 0,
        }
    }
}

#[derive(Debug, Clone)]
/// Builder for [Dictionary]
pub struct DictionaryBuilder<K> {
    config: Config,
    comparator: Comparator<K>,
}

impl<K: Ord> Default for DictionaryBuilder<K> {
    fn default() -> Self {
        Self::new(comparator::natural)
    }
}

impl<K> DictionaryBuilder<K> {
    /// Start a builder ordering keys with `comparator`.
    pub fn new(comparator: Comparator<K>) -> Self {
        Self {
            config: Config::default(),
            comparator,
        }
    }

    /// Set the display name.
    pub fn name(&mut self, name: &str) -> &mut Self {
        self.config.name = name.to_string();

        self
    }

    /// Set the number of element slots allocated up front.
    pub fn capacity(&mut self, capacity: usize) -> &mut Self {
        self.config.capacity = capacity;

        self
    }

    /// Replace the comparator.
    pub fn comparator(&mut self, comparator: Comparator<K>) -> &mut Self {
        self.comparator = comparator;

        self
    }

    /// Create the dictionary and register it in `registry`.
    pub fn build<V>(&self, registry: &Registry) -> Dictionary<K, V> {
        Dictionary::with_config(registry, self.config.clone(), self.comparator)
    }
}
