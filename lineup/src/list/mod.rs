// src/list/mod.rs

//! A doubly-linked list whose nodes live in a generational arena.
//!
//! Every push hands back a [`NodeKey`]. The key carries the id of the list that
//! owns the node (a non-owning back-reference) together with the node's
//! generational arena index, so a node can be detached in O(1).
//!
//! [`List::remove`] unlinks a node but leaves it holding its value, so removing
//! it again hands back the same value. [`List::take`] moves the value out and
//! frees the node; after that, like a key from a different list, the key
//! refers to nothing.
//!
//! ```
//! use lineup::List;
//!
//! let mut list: List<u32> = (0..5).collect();
//! let key = list.key_at(2).unwrap();
//!
//! assert_eq!(list.remove(key), Some(&2));
//! assert_eq!(list.remove(key), Some(&2)); // already unlinked
//! assert_eq!(list.len(), 4);
//! assert_eq!(list.take(key), Some(2));
//! assert_eq!(list.remove(key), None);
//!
//! assert_eq!(list.at(-1), Some(&4));
//! assert_eq!(list.slice(Some(1), Some(-1)).into_iter().collect::<Vec<_>>(), vec![1, 3]);
//! ```

mod iter;

use core::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use futures_core::Stream;
use futures_util::StreamExt;
use generational_arena::{Arena, Index};

pub use iter::{Direction, IntoIter, Iter, Nodes};

static NEXT_LIST_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique identity of a list, used to validate node membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ListId(u64);

impl ListId {
  fn next() -> Self {
    ListId(NEXT_LIST_ID.fetch_add(1, AtomicOrdering::Relaxed))
  }
}

/// A handle to a node of a [`List`].
///
/// Keys are plain copyable values. They do not keep the node alive: once the
/// node is taken (or the list is cleared) the key refers to nothing and every
/// operation taking it becomes a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey {
  owner: ListId,
  index: Index,
}

#[derive(Debug, Clone)]
struct Node<T> {
  value: T,
  prev: Option<Index>,
  next: Option<Index>,
  // False once `remove` detached the node; the value is still held.
  linked: bool,
}

/// An ordered, mutable sequence with O(1) push/pop at both ends and O(1)
/// removal or splice-insertion at any node.
pub struct List<T> {
  id: ListId,
  // The arena owns every node, linked or detached. Links between nodes are
  // arena indices.
  nodes: Arena<Node<T>>,
  head: Option<Index>,
  tail: Option<Index>,
  len: usize,
}

impl<T> List<T> {
  /// Creates an empty list.
  pub fn new() -> Self {
    Self {
      id: ListId::next(),
      nodes: Arena::new(),
      head: None,
      tail: None,
      len: 0,
    }
  }

  /// Creates an empty list with room for `capacity` nodes before reallocating.
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      id: ListId::next(),
      nodes: Arena::with_capacity(capacity),
      head: None,
      tail: None,
      len: 0,
    }
  }

  /// Collects every item of `stream` into a new list, in arrival order.
  pub async fn from_stream<S>(stream: S) -> Self
  where
    S: Stream<Item = T>,
  {
    stream.collect().await
  }

  /// Returns the number of linked nodes.
  #[inline]
  pub fn len(&self) -> usize {
    self.len
  }

  /// Returns `true` if the list holds no nodes.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  #[inline]
  fn key(&self, index: Index) -> NodeKey {
    NodeKey {
      owner: self.id,
      index,
    }
  }

  // Maps a key back to its arena slot if this list still holds the node,
  // linked or detached.
  #[inline]
  fn resolve_held(&self, key: NodeKey) -> Option<Index> {
    if key.owner == self.id && self.nodes.contains(key.index) {
      Some(key.index)
    } else {
      None
    }
  }

  // Like `resolve_held`, but only for nodes still linked into the chain.
  #[inline]
  fn resolve(&self, key: NodeKey) -> Option<Index> {
    self
      .resolve_held(key)
      .filter(|&index| self.nodes[index].linked)
  }

  /// Returns `true` if `key` refers to a node currently linked into this list.
  pub fn is_linked(&self, key: NodeKey) -> bool {
    self.resolve(key).is_some()
  }

  /// Returns the first node.
  pub fn head(&self) -> Option<NodeRef<'_, T>> {
    self.head.map(|index| NodeRef::new(self, index))
  }

  /// Returns the last node.
  pub fn tail(&self) -> Option<NodeRef<'_, T>> {
    self.tail.map(|index| NodeRef::new(self, index))
  }

  /// Returns a reference to the first value.
  pub fn front(&self) -> Option<&T> {
    self.head.map(|index| &self.nodes[index].value)
  }

  /// Returns a reference to the last value.
  pub fn back(&self) -> Option<&T> {
    self.tail.map(|index| &self.nodes[index].value)
  }

  /// Returns a read-only view of the node behind `key`.
  pub fn node(&self, key: NodeKey) -> Option<NodeRef<'_, T>> {
    self.resolve(key).map(|index| NodeRef::new(self, index))
  }

  /// Returns the value stored in the node behind `key`. A node detached with
  /// [`remove`](List::remove) still holds its value.
  pub fn get(&self, key: NodeKey) -> Option<&T> {
    let index = self.resolve_held(key)?;
    Some(&self.nodes[index].value)
  }

  /// Returns a mutable reference to the value stored in the node behind `key`.
  pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut T> {
    let index = self.resolve_held(key)?;
    Some(&mut self.nodes[index].value)
  }

  /// Appends `value` at the tail.
  #[doc(alias = "push_back")]
  pub fn push(&mut self, value: T) -> NodeKey {
    let index = self.nodes.insert(Node {
      value,
      prev: self.tail,
      next: None,
      linked: true,
    });
    self.len += 1;

    match self.tail {
      Some(tail) => self.nodes[tail].next = Some(index),
      None => self.head = Some(index),
    }
    self.tail = Some(index);

    self.key(index)
  }

  /// Prepends `value` at the head.
  #[doc(alias = "push_front")]
  pub fn unshift(&mut self, value: T) -> NodeKey {
    let index = self.nodes.insert(Node {
      value,
      prev: None,
      next: self.head,
      linked: true,
    });
    self.len += 1;

    match self.head {
      Some(head) => self.nodes[head].prev = Some(index),
      None => self.tail = Some(index),
    }
    self.head = Some(index);

    self.key(index)
  }

  /// Appends every value at the tail, in order. Returns the new length.
  pub fn append<I>(&mut self, values: I) -> usize
  where
    I: IntoIterator<Item = T>,
  {
    for value in values {
      self.push(value);
    }
    self.len()
  }

  /// Prepends every value at the head, one after another. Returns the new length.
  ///
  /// Each value becomes the new head in turn, so the last value yielded by
  /// `values` ends up first.
  pub fn prepend<I>(&mut self, values: I) -> usize
  where
    I: IntoIterator<Item = T>,
  {
    for value in values {
      self.unshift(value);
    }
    self.len()
  }

  /// Removes and returns the last value.
  #[doc(alias = "pop_back")]
  pub fn pop(&mut self) -> Option<T> {
    let tail = self.tail?;
    self.detach(tail);
    self.nodes.remove(tail).map(|node| node.value)
  }

  /// Removes and returns the first value.
  #[doc(alias = "pop_front")]
  pub fn shift(&mut self) -> Option<T> {
    let head = self.head?;
    self.detach(head);
    self.nodes.remove(head).map(|node| node.value)
  }

  /// Unlinks the node behind `key` and returns the value it stores.
  ///
  /// The node keeps holding its value, so removing an already-unlinked node
  /// does nothing and returns the same value again. Use [`take`](List::take)
  /// to move the value out and release the node. Returns `None` for keys of
  /// another list or of a node that was taken or cleared.
  pub fn remove(&mut self, key: NodeKey) -> Option<&T> {
    let index = self.resolve_held(key)?;
    self.detach(index);
    Some(&self.nodes[index].value)
  }

  /// Unlinks the node behind `key` if it is still linked, releases it and
  /// moves its value out. Later calls with the same key return `None`.
  pub fn take(&mut self, key: NodeKey) -> Option<T> {
    let index = self.resolve_held(key)?;
    self.detach(index);
    self.nodes.remove(index).map(|node| node.value)
  }

  // Splices a node out of the chain, leaving it in the arena. No-op if it is
  // already detached.
  fn detach(&mut self, index: Index) {
    let (prev, next) = {
      let node = &mut self.nodes[index];
      if !node.linked {
        return;
      }
      node.linked = false;
      (node.prev.take(), node.next.take())
    };

    match prev {
      Some(prev) => self.nodes[prev].next = next,
      None => self.head = next,
    }
    match next {
      Some(next) => self.nodes[next].prev = prev,
      None => self.tail = prev,
    }
    self.len -= 1;
  }

  /// Links a new node holding `value` directly before the node behind `key`.
  ///
  /// If `key` is not linked to this list the value is handed back untouched.
  pub fn insert_before(&mut self, key: NodeKey, value: T) -> Result<NodeKey, T> {
    let Some(target) = self.resolve(key) else {
      return Err(value);
    };

    let prev = self.nodes[target].prev;
    let index = self.nodes.insert(Node {
      value,
      prev,
      next: Some(target),
      linked: true,
    });
    self.len += 1;

    self.nodes[target].prev = Some(index);
    match prev {
      Some(prev) => self.nodes[prev].next = Some(index),
      None => self.head = Some(index),
    }

    Ok(self.key(index))
  }

  /// Links a new node holding `value` directly after the node behind `key`.
  ///
  /// If `key` is not linked to this list the value is handed back untouched.
  pub fn insert_after(&mut self, key: NodeKey, value: T) -> Result<NodeKey, T> {
    let Some(target) = self.resolve(key) else {
      return Err(value);
    };

    let next = self.nodes[target].next;
    let index = self.nodes.insert(Node {
      value,
      prev: Some(target),
      next,
      linked: true,
    });
    self.len += 1;

    self.nodes[target].next = Some(index);
    match next {
      Some(next) => self.nodes[next].prev = Some(index),
      None => self.tail = Some(index),
    }

    Ok(self.key(index))
  }

  // Resolves a possibly negative position to an offset from the head.
  fn offset(&self, index: isize) -> Option<usize> {
    let len = self.len();
    let offset = if index < 0 {
      len.checked_sub(index.unsigned_abs())?
    } else {
      index as usize
    };
    (offset < len).then_some(offset)
  }

  // Resolves a possibly negative bound, clamped into `[0, len]`.
  fn clamp(&self, bound: isize) -> usize {
    let len = self.len();
    if bound < 0 {
      len.saturating_sub(bound.unsigned_abs())
    } else {
      (bound as usize).min(len)
    }
  }

  /// Returns the key of the node at `index`. Negative indices count from the
  /// tail, so `-1` is the last node. Walks from whichever end is nearer.
  pub fn key_at(&self, index: isize) -> Option<NodeKey> {
    let offset = self.offset(index)?;
    let from_tail = self.len() - 1 - offset;

    let node = if offset <= from_tail {
      self.nodes(Direction::Next).nth(offset)
    } else {
      self.nodes(Direction::Prev).nth(from_tail)
    };
    node.map(|node| node.key())
  }

  /// Returns the value at `index`, counting from the tail for negative indices.
  /// Out-of-range indices yield `None`.
  pub fn at(&self, index: isize) -> Option<&T> {
    self.key_at(index).and_then(|key| self.get(key))
  }

  /// Copies the values in `start..end` into a new list.
  ///
  /// Missing bounds default to the whole list, negative bounds count from the
  /// tail, and out-of-range bounds are clamped rather than rejected.
  pub fn slice(&self, start: Option<isize>, end: Option<isize>) -> List<T>
  where
    T: Clone,
  {
    let start = start.map_or(0, |bound| self.clamp(bound));
    let end = end.map_or(self.len(), |bound| self.clamp(bound));

    self
      .nodes(Direction::Next)
      .skip(start)
      .take(end.saturating_sub(start))
      .map(|node| node.value().clone())
      .collect()
  }

  /// Returns a cursor starting at the head (`Direction::Next`) or at the tail
  /// (`Direction::Prev`).
  pub fn nodes(&self, direction: Direction) -> Nodes<'_, T> {
    let start = match direction {
      Direction::Next => self.head,
      Direction::Prev => self.tail,
    };
    Nodes::new(self, start, direction)
  }

  /// Returns a cursor starting at the node behind `key`. The cursor is empty if
  /// the key is not linked.
  pub fn nodes_from(&self, key: NodeKey, direction: Direction) -> Nodes<'_, T> {
    Nodes::new(self, self.resolve(key), direction)
  }

  /// Iterates over the values from head to tail.
  pub fn iter(&self) -> Iter<'_, T> {
    Iter::new(self)
  }

  /// Drops every node, detached ones included. Keys handed out before the call
  /// refer to nothing afterwards.
  pub fn clear(&mut self) {
    self.id = ListId::next();
    self.nodes.clear();
    self.head = None;
    self.tail = None;
    self.len = 0;
  }

  /// Walks the chain in both directions and checks it against the arena.
  #[cfg(test)]
  pub(crate) fn assert_valid(&self) {
    let mut forward = 0;
    let mut prev = None;
    let mut current = self.head;
    while let Some(index) = current {
      let node = &self.nodes[index];
      assert_eq!(node.prev, prev, "broken prev link at position {}", forward);
      assert!(node.linked, "detached node reachable at position {}", forward);
      forward += 1;
      prev = Some(index);
      current = node.next;
    }
    assert_eq!(prev, self.tail, "tail is not the last node reachable from head");
    assert_eq!(forward, self.len(), "forward walk disagrees with size");

    let backward = self.nodes(Direction::Prev).count();
    assert_eq!(backward, self.len(), "backward walk disagrees with size");

    for (_, node) in self.nodes.iter().filter(|(_, node)| !node.linked) {
      assert!(node.prev.is_none() && node.next.is_none(), "detached node still has links");
    }
    let linked = self.nodes.iter().filter(|(_, node)| node.linked).count();
    assert_eq!(linked, self.len(), "linked nodes in the arena disagree with size");
  }
}

impl<T> Default for List<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: Clone> Clone for List<T> {
  fn clone(&self) -> Self {
    self.iter().cloned().collect()
  }
}

impl<T: fmt::Debug> fmt::Debug for List<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list().entries(self.iter()).finish()
  }
}

impl<T: PartialEq> PartialEq for List<T> {
  fn eq(&self, other: &Self) -> bool {
    self.len() == other.len() && self.iter().eq(other.iter())
  }
}

impl<T: Eq> Eq for List<T> {}

impl<T> FromIterator<T> for List<T> {
  fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
    let mut list = List::new();
    list.append(iter);
    list
  }
}

impl<T> Extend<T> for List<T> {
  fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
    self.append(iter);
  }
}

impl<T> IntoIterator for List<T> {
  type Item = T;
  type IntoIter = IntoIter<T>;

  fn into_iter(self) -> Self::IntoIter {
    IntoIter::new(self)
  }
}

impl<'a, T> IntoIterator for &'a List<T> {
  type Item = &'a T;
  type IntoIter = Iter<'a, T>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

/// A read-only view of one linked node.
pub struct NodeRef<'a, T> {
  list: &'a List<T>,
  index: Index,
}

impl<'a, T> NodeRef<'a, T> {
  fn new(list: &'a List<T>, index: Index) -> Self {
    Self { list, index }
  }

  /// The value held by this node.
  pub fn value(&self) -> &'a T {
    &self.list.nodes[self.index].value
  }

  /// The key that identifies this node in its list.
  pub fn key(&self) -> NodeKey {
    self.list.key(self.index)
  }

  /// The neighbor towards the head.
  pub fn prev(&self) -> Option<NodeRef<'a, T>> {
    self.list.nodes[self.index].prev.map(|index| NodeRef::new(self.list, index))
  }

  /// The neighbor towards the tail.
  pub fn next(&self) -> Option<NodeRef<'a, T>> {
    self.list.nodes[self.index].next.map(|index| NodeRef::new(self.list, index))
  }

  /// Returns `true` if this node is the head of its list.
  pub fn is_head(&self) -> bool {
    self.list.head == Some(self.index)
  }

  /// Returns `true` if this node is the tail of its list.
  pub fn is_tail(&self) -> bool {
    self.list.tail == Some(self.index)
  }
}

impl<T> Clone for NodeRef<'_, T> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<T> Copy for NodeRef<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for NodeRef<'_, T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("NodeRef")
      .field("key", &self.key())
      .field("value", self.value())
      .finish()
  }
}
