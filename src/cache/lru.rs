//! Recency List Module
//!
//! Doubly-linked list of cache entries ordered by recency of use, stored in
//! a generational arena so handles stay valid across unrelated removals.

use generational_arena::{Arena, Index};

/// Stable handle to a node of a [`RecencyList`].
pub type Handle = Index;

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<Index>,
    next: Option<Index>,
}

// == Recency List ==
/// Tracks access order for eviction.
///
/// - Front (head) = most recently used
/// - Back (tail) = least recently used
///
/// Push, move and remove are O(1). A handle whose node was removed is
/// rejected by every method rather than aliasing a newer node.
#[derive(Debug)]
pub struct RecencyList<T> {
    nodes: Arena<Node<T>>,
    head: Option<Index>,
    tail: Option<Index>,
}

impl<T> RecencyList<T> {
    // == Constructor ==
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    // Detaches a node from its neighbours without freeing it.
    fn unlink(&mut self, index: Index) {
        let (prev, next) = {
            let node = &self.nodes[index];
            (node.prev, node.next)
        };

        match prev {
            Some(prev) => self.nodes[prev].next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.nodes[next].prev = prev,
            None => self.tail = prev,
        }
    }

    // Links an arena-resident node in as the new head.
    fn link_front(&mut self, index: Index) {
        let old_head = self.head;
        {
            let node = &mut self.nodes[index];
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(old_head) => self.nodes[old_head].prev = Some(index),
            None => self.tail = Some(index),
        }
        self.head = Some(index);
    }

    // == Push Front ==
    /// Inserts a value as the most recently used node.
    pub fn push_front(&mut self, value: T) -> Handle {
        let index = self.nodes.insert(Node {
            value,
            prev: None,
            next: None,
        });
        self.link_front(index);
        index
    }

    // == Move To Front ==
    /// Marks a node as most recently used.
    ///
    /// Returns false if the handle is stale.
    pub fn move_to_front(&mut self, handle: Handle) -> bool {
        if !self.nodes.contains(handle) {
            return false;
        }
        if self.head != Some(handle) {
            self.unlink(handle);
            self.link_front(handle);
        }
        true
    }

    // == Remove ==
    /// Unlinks and frees a node, returning its value.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        if !self.nodes.contains(handle) {
            return None;
        }
        self.unlink(handle);
        self.nodes.remove(handle).map(|node| node.value)
    }

    /// Handle of the most recently used node.
    pub fn front(&self) -> Option<Handle> {
        self.head
    }

    /// Handle of the least recently used node.
    pub fn back(&self) -> Option<Handle> {
        self.tail
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.nodes.get(handle).map(|node| &node.value)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.nodes.get_mut(handle).map(|node| &mut node.value)
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.nodes.contains(handle)
    }

    // == Length ==
    /// Returns the number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates from most to least recently used.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Front-to-back iterator over a [`RecencyList`].
pub struct Iter<'a, T> {
    list: &'a RecencyList<T>,
    cursor: Option<Index>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (Handle, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor?;
        let node = self.list.nodes.get(index)?;
        self.cursor = node.next;
        Some((index, &node.value))
    }
}
