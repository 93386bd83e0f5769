//! Tree and list links shared by every element of a dictionary.
//!
//! A [Topology] knows nothing about keys or values. Every routine that needs
//! to compare receives a `probe` closure returning how the target key orders
//! against the key stored at a given node, which keeps this type free of
//! generics so that a [crate::Registry] can hold any dictionary's topology.
//!
//! Only [Topology::retune], [Topology::link] and [Topology::unlink_root] write
//! to the links. Everything else reads.

use std::cmp::Ordering;

use crate::common::DictionaryStats;

/// Index of a node inside a dictionary's slab.
pub(crate) type NodeId = usize;

#[derive(Debug, Clone, Copy, Default)]
struct Links {
    left: Option<NodeId>,
    right: Option<NodeId>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
    /// Ascending rank, trusted only while the topology is not dirty.
    position: usize,
}

#[derive(Debug)]
pub(crate) struct Topology {
    name: String,
    root: Option<NodeId>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    count: usize,
    dirty: bool,
    links: Vec<Links>,
}

impl Topology {
    pub fn new(name: &str, capacity: usize) -> Self {
        Topology {
            name: name.to_string(),
            root: None,
            head: None,
            tail: None,
            count: 0,
            dirty: false,
            links: Vec::with_capacity(capacity),
        }
    }

    // === Getters ===

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn head(&self) -> Option<NodeId> {
        self.head
    }

    pub fn tail(&self) -> Option<NodeId> {
        self.tail
    }

    pub fn count(&self) -> usize {
        self.count
    }

    #[cfg(test)]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn next(&self, node: NodeId) -> Option<NodeId> {
        self.links.get(node).and_then(|l| l.next)
    }

    pub fn prev(&self, node: NodeId) -> Option<NodeId> {
        self.links.get(node).and_then(|l| l.prev)
    }

    // === Public Methods ===

    /// Top-down splay toward the key described by `probe`.
    ///
    /// Afterwards the root is the node holding that key, or the last node
    /// visited on the way to where it would be.
    pub fn retune<F>(&mut self, mut probe: F)
    where
        F: FnMut(NodeId) -> Ordering,
    {
        let mut node = match self.root {
            Some(root) => root,
            None => return,
        };

        // Nodes known to be smaller than the target, chained through `right`.
        let mut left_root: Option<NodeId> = None;
        let mut left_tail: Option<NodeId> = None;
        // Nodes known to be larger than the target, chained through `left`.
        let mut right_root: Option<NodeId> = None;
        let mut right_tail: Option<NodeId> = None;

        loop {
            match probe(node) {
                Ordering::Equal => break,
                Ordering::Less => {
                    let mut child = match self.links[node].left {
                        Some(child) => child,
                        None => break,
                    };

                    if probe(child) == Ordering::Less {
                        // zig-zig: rotate right
                        self.links[node].left = self.links[child].right;
                        self.links[child].right = Some(node);
                        node = child;

                        child = match self.links[node].left {
                            Some(child) => child,
                            None => break,
                        };
                    }

                    match right_tail {
                        Some(tail) => self.links[tail].left = Some(node),
                        None => right_root = Some(node),
                    }
                    right_tail = Some(node);
                    node = child;
                }
                Ordering::Greater => {
                    let mut child = match self.links[node].right {
                        Some(child) => child,
                        None => break,
                    };

                    if probe(child) == Ordering::Greater {
                        // zag-zag: rotate left
                        self.links[node].right = self.links[child].left;
                        self.links[child].left = Some(node);
                        node = child;

                        child = match self.links[node].right {
                            Some(child) => child,
                            None => break,
                        };
                    }

                    match left_tail {
                        Some(tail) => self.links[tail].right = Some(node),
                        None => left_root = Some(node),
                    }
                    left_tail = Some(node);
                    node = child;
                }
            }
        }

        // Reassemble: the L tree takes node's left subtree on its right edge,
        // the R tree takes node's right subtree on its left edge.
        let (node_left, node_right) = (self.links[node].left, self.links[node].right);

        match left_tail {
            Some(tail) => self.links[tail].right = node_left,
            None => left_root = node_left,
        }
        match right_tail {
            Some(tail) => self.links[tail].left = node_right,
            None => right_root = node_right,
        }

        self.links[node].left = left_root;
        self.links[node].right = right_root;
        self.root = Some(node);
    }

    /// Link a fresh node into both the tree and the list, making it the root.
    ///
    /// `probe` orders the new node's key against the key at a given node.
    /// When an equal key is already present nothing is linked and the existing
    /// node (now the root) is returned as the error.
    pub fn link<F>(&mut self, id: NodeId, mut probe: F) -> Result<(), NodeId>
    where
        F: FnMut(NodeId) -> Ordering,
    {
        self.dirty = true;

        if id >= self.links.len() {
            self.links.resize(id + 1, Links::default());
        }
        self.links[id] = Links::default();

        let root = match self.root {
            Some(root) => root,
            None => {
                self.root = Some(id);
                self.head = Some(id);
                self.tail = Some(id);
                self.count += 1;

                return Ok(());
            }
        };

        self.retune(&mut probe);
        let root = self.root.unwrap_or(root);

        match probe(root) {
            Ordering::Less => {
                let root_prev = self.links[root].prev;

                self.links[id].left = self.links[root].left;
                self.links[id].right = Some(root);
                self.links[root].left = None;

                match root_prev {
                    Some(prev) => self.links[prev].next = Some(id),
                    None => self.head = Some(id),
                }

                self.links[id].prev = root_prev;
                self.links[id].next = Some(root);
                self.links[root].prev = Some(id);
            }
            Ordering::Greater => {
                let root_next = self.links[root].next;

                self.links[id].right = self.links[root].right;
                self.links[id].left = Some(root);
                self.links[root].right = None;

                match root_next {
                    Some(next) => self.links[next].prev = Some(id),
                    None => self.tail = Some(id),
                }

                self.links[id].next = root_next;
                self.links[id].prev = Some(root);
                self.links[root].next = Some(id);
            }
            Ordering::Equal => return Err(root),
        }

        self.root = Some(id);
        self.count += 1;

        Ok(())
    }

    /// Unlink the current root from both the tree and the list.
    ///
    /// Callers retune onto the node they want removed first.
    pub fn unlink_root(&mut self) -> Option<NodeId> {
        let removed = self.root?;

        self.dirty = true;

        let Links {
            left, right, prev, next, ..
        } = self.links[removed];

        self.root = match (left, right) {
            (None, _) => right,
            (_, None) => left,
            (Some(_), Some(right)) => {
                // The list successor is the leftmost node of the right subtree,
                // so it has no left child of its own.
                let successor = next?;
                debug_assert!(self.links[successor].left.is_none());

                if successor != right {
                    let mut parent = right;
                    while let Some(child) = self.links[parent].left {
                        if child == successor {
                            break;
                        }
                        parent = child;
                    }
                    debug_assert_eq!(self.links[parent].left, Some(successor));

                    self.links[parent].left = self.links[successor].right;
                    self.links[successor].right = Some(right);
                }

                self.links[successor].left = left;
                Some(successor)
            }
        };

        match prev {
            Some(prev) => self.links[prev].next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.links[next].prev = prev,
            None => self.tail = prev,
        }

        self.links[removed] = Links::default();
        self.count -= 1;

        Some(removed)
    }

    /// Forget every node.
    pub fn clear(&mut self) {
        self.root = None;
        self.head = None;
        self.tail = None;
        self.count = 0;
        self.dirty = false;
        self.links.clear();
    }

    /// Cached rank of `node`, rebuilding the whole index first if it is stale.
    pub fn position(&mut self, node: NodeId) -> usize {
        if self.dirty {
            self.rebuild_positions();
        }

        self.links[node].position
    }

    /// Sum of all node depths and the deepest depth, root at depth 0.
    pub fn depths(&self) -> (usize, usize) {
        let mut sum = 0;
        let mut max = 0;

        let mut stack = Vec::new();
        if let Some(root) = self.root {
            stack.push((root, 0));
        }

        while let Some((node, depth)) = stack.pop() {
            sum += depth;
            max = max.max(depth);

            if let Some(left) = self.links[node].left {
                stack.push((left, depth + 1));
            }
            if let Some(right) = self.links[node].right {
                stack.push((right, depth + 1));
            }
        }

        (sum, max)
    }

    pub fn statistics(&self) -> DictionaryStats {
        let (depth_sum, max_depth) = self.depths();

        DictionaryStats::new(self.name.clone(), self.count, depth_sum, max_depth)
    }

    // === Private Methods ===

    fn rebuild_positions(&mut self) {
        tracing::trace!(name = %self.name, count = self.count, "Rebuilding linear index");

        let mut current = self.head;
        let mut position = 0;

        while let Some(node) = current {
            self.links[node].position = position;
            position += 1;
            current = self.links[node].next;
        }

        self.dirty = false;
    }

    /// In-order walk of the tree, used to cross-check the list.
    #[cfg(test)]
    pub fn in_order(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = Vec::new();
        let mut current = self.root;

        while current.is_some() || !stack.is_empty() {
            while let Some(node) = current {
                stack.push(node);
                current = self.links[node].left;
            }
            if let Some(node) = stack.pop() {
                out.push(node);
                current = self.links[node].right;
            }
        }

        out
    }

    #[cfg(test)]
    pub fn list(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.head;

        while let Some(node) = current {
            out.push(node);
            current = self.links[node].next;
        }

        out
    }
}
