//! Ascending traversal: a borrowing [Iter] and a detached [Cursor].

use std::iter::FusedIterator;

use tracing::warn;

use crate::{
    common::{Element, ElementRef, NodeId},
    Dictionary, Error, Result,
};

#[derive(Debug)]
/// Iterator over a dictionary's elements in ascending key order.
///
/// Walks the linked list, so it never retunes the tree.
pub struct Iter<'a, K, V> {
    dict: &'a Dictionary<K, V>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(dict: &'a Dictionary<K, V>) -> Self {
        Iter {
            dict,
            front: dict.head_id(),
            back: dict.tail_id(),
            remaining: dict.size(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let id = self.front?;
        self.front = self.dict.next_id(id);
        self.remaining -= 1;

        Some(self.dict.entry(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let id = self.back?;
        self.back = self.dict.prev_id(id);
        self.remaining -= 1;

        Some(self.dict.entry(id))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Stateful cursor that does not borrow its dictionary between steps.
///
/// Callers can interleave [Cursor::advance] with arbitrary mutation. The
/// element after the current one is captured when the cursor lands on it, so
/// deleting the current element does not derail the walk. Deleting the
/// captured successor ends it.
pub struct Cursor {
    current: Option<ElementRef>,
    next: Option<ElementRef>,
}

impl Cursor {
    pub(crate) fn start<K, V>(dict: &Dictionary<K, V>) -> Self {
        let current = dict.head_handle();

        Cursor {
            current,
            next: current.and_then(|handle| dict.next_handle(handle)),
        }
    }

    // === Getters ===

    /// Handle of the element the cursor is on.
    pub fn element(&self) -> Option<ElementRef> {
        self.current
    }

    /// Returns `true` once the cursor has walked past the largest element.
    pub fn is_finished(&self) -> bool {
        self.current.is_none()
    }

    /// Value of the element the cursor is on, `None` if finished or if that
    /// element was deleted.
    pub fn current<'a, K, V>(&self, dict: &'a Dictionary<K, V>) -> Option<&'a V> {
        dict.value(self.current?)
    }

    /// Key and value of the element the cursor is on.
    pub fn current_entry<'a, K, V>(&self, dict: &'a Dictionary<K, V>) -> Option<Element<'a, K, V>> {
        dict.get(self.current?)
    }

    // === Public Methods ===

    /// Step to the captured successor.
    ///
    /// Advancing a finished cursor is a caller bug: it is logged and reported
    /// as [Error::CursorExhausted], leaving the cursor as it was.
    pub fn advance<K, V>(&mut self, dict: &Dictionary<K, V>) -> Result<()> {
        if self.current.is_none() {
            warn!(name = %dict.name(), "Cursor advanced after iteration finished");

            return Err(Error::CursorExhausted(dict.name().to_string()));
        }

        self.current = self.next.filter(|handle| dict.is_live(*handle));
        self.next = self.current.and_then(|handle| dict.next_handle(handle));

        Ok(())
    }
}
