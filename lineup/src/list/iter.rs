// src/list/iter.rs

use core::fmt;
use std::iter::FusedIterator;

use generational_arena::Index;

use super::{List, NodeRef};

/// The link a [`Nodes`] cursor follows when it advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
  /// Towards the tail.
  #[default]
  Next,
  /// Towards the head.
  Prev,
}

impl Direction {
  /// Returns the opposite direction.
  #[inline]
  pub fn reversed(self) -> Self {
    match self {
      Direction::Next => Direction::Prev,
      Direction::Prev => Direction::Next,
    }
  }
}

/// A lazy cursor over the nodes of a [`List`].
///
/// Each step yields the current node and moves along the active link. The
/// active link can be flipped mid-walk with [`Nodes::reverse`]; the cursor
/// then continues from where it stands in the other direction. Composes with
/// the usual iterator adapters (`skip`, `take`, `map`, ...) without building
/// any intermediate sequence.
pub struct Nodes<'a, T> {
  list: &'a List<T>,
  current: Option<Index>,
  direction: Direction,
}

impl<'a, T> Nodes<'a, T> {
  pub(super) fn new(list: &'a List<T>, start: Option<Index>, direction: Direction) -> Self {
    Self {
      list,
      current: start,
      direction,
    }
  }

  /// Flips the active link in place.
  pub fn reverse(&mut self) -> &mut Self {
    self.direction = self.direction.reversed();
    self
  }

  /// The link followed by the next step.
  pub fn direction(&self) -> Direction {
    self.direction
  }

  /// The node the next step will yield, without advancing.
  pub fn peek(&self) -> Option<NodeRef<'a, T>> {
    self.current.map(|index| NodeRef::new(self.list, index))
  }
}

impl<'a, T> Iterator for Nodes<'a, T> {
  type Item = NodeRef<'a, T>;

  fn next(&mut self) -> Option<Self::Item> {
    let index = self.current?;
    let node = &self.list.nodes[index];
    self.current = match self.direction {
      Direction::Next => node.next,
      Direction::Prev => node.prev,
    };
    Some(NodeRef::new(self.list, index))
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    match self.current {
      Some(_) => (1, Some(self.list.len())),
      None => (0, Some(0)),
    }
  }
}

impl<T> FusedIterator for Nodes<'_, T> {}

impl<T> Clone for Nodes<'_, T> {
  fn clone(&self) -> Self {
    Self {
      list: self.list,
      current: self.current,
      direction: self.direction,
    }
  }
}

impl<T> fmt::Debug for Nodes<'_, T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Nodes")
      .field("current", &self.current)
      .field("direction", &self.direction)
      .finish()
  }
}

/// Borrowing iterator over the values of a [`List`], head to tail.
pub struct Iter<'a, T> {
  list: &'a List<T>,
  front: Option<Index>,
  back: Option<Index>,
  remaining: usize,
}

impl<'a, T> Iter<'a, T> {
  pub(super) fn new(list: &'a List<T>) -> Self {
    Self {
      list,
      front: list.head,
      back: list.tail,
      remaining: list.len(),
    }
  }
}

impl<'a, T> Iterator for Iter<'a, T> {
  type Item = &'a T;

  fn next(&mut self) -> Option<Self::Item> {
    if self.remaining == 0 {
      return None;
    }
    let list: &'a List<T> = self.list;
    let node = &list.nodes[self.front?];
    self.front = node.next;
    self.remaining -= 1;
    Some(&node.value)
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    (self.remaining, Some(self.remaining))
  }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
  fn next_back(&mut self) -> Option<Self::Item> {
    if self.remaining == 0 {
      return None;
    }
    let list = self.list;
    let node = &list.nodes[self.back?];
    self.back = node.prev;
    self.remaining -= 1;
    Some(&node.value)
  }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
  fn clone(&self) -> Self {
    Self {
      list: self.list,
      front: self.front,
      back: self.back,
      remaining: self.remaining,
    }
  }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list().entries(self.clone()).finish()
  }
}

/// Owning iterator that drains a [`List`] from the head.
pub struct IntoIter<T> {
  list: List<T>,
}

impl<T> IntoIter<T> {
  pub(super) fn new(list: List<T>) -> Self {
    Self { list }
  }
}

impl<T> Iterator for IntoIter<T> {
  type Item = T;

  fn next(&mut self) -> Option<T> {
    self.list.shift()
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    (self.list.len(), Some(self.list.len()))
  }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
  fn next_back(&mut self) -> Option<T> {
    self.list.pop()
  }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("IntoIter").field(&self.list).finish()
  }
}
