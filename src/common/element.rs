//! Handles and borrowed views of dictionary elements.

use std::fmt::{self, Debug, Formatter};

use crate::common::NodeId;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
/// Copyable handle to one element of a [crate::Dictionary].
///
/// A handle stays valid until its element is deleted. After that every
/// accessor returns `None` for it, even if the slot is reused by a later insert.
pub struct ElementRef {
    pub(crate) index: NodeId,
    pub(crate) generation: u32,
}

impl ElementRef {
    pub(crate) fn new(index: NodeId, generation: u32) -> Self {
        ElementRef { index, generation }
    }
}

impl Debug for ElementRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "ElementRef({}v{})", self.index, self.generation)
    }
}

#[derive(Debug)]
/// Borrowed view of one key/value pair, as returned by lookups.
pub struct Element<'a, K, V> {
    handle: ElementRef,
    key: &'a K,
    value: &'a V,
}

impl<'a, K, V> Element<'a, K, V> {
    pub(crate) fn new(handle: ElementRef, key: &'a K, value: &'a V) -> Self {
        Element { handle, key, value }
    }

    /// Handle that can be used to reach this element again later.
    pub fn handle(&self) -> ElementRef {
        self.handle
    }

    pub fn key(&self) -> &'a K {
        self.key
    }

    pub fn value(&self) -> &'a V {
        self.value
    }
}

impl<K, V> Clone for Element<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for Element<'_, K, V> {}
