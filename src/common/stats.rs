//! Shape statistics reported by the diagnostics sweep.

use std::fmt::{self, Display, Formatter};

/// Kind tag printed in the second column of every stats line.
pub const STATS_KIND: &str = "DICT";

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
/// Size and depth summary of one dictionary's tree.
///
/// Depths are counted from the root, which sits at depth 0.
pub struct DictionaryStats {
    name: String,
    count: usize,
    depth_sum: usize,
    max_depth: usize,
}

impl DictionaryStats {
    pub(crate) fn new(name: String, count: usize, depth_sum: usize, max_depth: usize) -> Self {
        Self {
            name,
            count,
            depth_sum,
            max_depth,
        }
    }

    // === Getters ===

    /// Display name of the dictionary.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of live elements.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Sum of the depths of every element.
    pub fn depth_sum(&self) -> usize {
        self.depth_sum
    }

    /// Integer average depth, `0` for an empty dictionary.
    pub fn average_depth(&self) -> usize {
        self.depth_sum.checked_div(self.count).unwrap_or(0)
    }

    /// Depth of the deepest element.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Display for DictionaryStats {
    /// One fixed-width line: name, kind, count, depth sum, average depth, max depth.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<30} {:<15} {:<10} {:<10} {:<10} {:<10}",
            self.name,
            STATS_KIND,
            self.count,
            self.depth_sum,
            self.average_depth(),
            self.max_depth
        )
    }
}
