// src/queue/mod.rs

//! A closable, ordered, optionally-bounded async queue.
//!
//! The queue buffers values in a [`List`] backlog. Producers [`push`] at the
//! tail; consumers take from the head ([`Ordering::Fifo`]) or from the tail
//! ([`Ordering::Lifo`]) through [`Queue::next`] or the [`Stream`]
//! implementation. A bounded queue suspends producers while the backlog is at
//! capacity. [`Queue::close`] is a one-way transition: no further pushes are
//! accepted, buffered values still drain, and iteration ends once the backlog
//! is empty.
//!
//! The queue does not depend on any executor. Every state change is a single
//! critical section, and each suspended operation re-checks its condition when
//! woken: a wake-up is a hint, not a reservation. Dropping a pending operation,
//! for example when it loses a race against a timer, withdraws its wake-up
//! registration.
//!
//! ```
//! # futures_util::FutureExt::now_or_never(async {
//! use futures_util::StreamExt;
//! use lineup::{unbounded, Ordering};
//!
//! let queue = unbounded(Ordering::Lifo);
//! assert!(queue.push(1).await);
//! assert!(queue.push(2).await);
//! queue.close();
//! assert!(!queue.push(3).await);
//!
//! let drained: Vec<i32> = queue.collect().await;
//! assert_eq!(drained, vec![2, 1]);
//! # }).unwrap();
//! ```
//!
//! [`push`]: Queue::push

mod config;
pub(crate) mod signal;

pub use config::{Ordering, QueueConfig};

use core::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::stream::{FusedStream, Stream};
use parking_lot::Mutex;

use self::signal::{wake_all, Signal, Slot};
use crate::error::{ConfigurationError, TryNextError, TryPushError};
use crate::list::List;

/// Creates a queue that holds at most `capacity` values.
///
/// Fails with [`ConfigurationError::InvalidCapacity`] if `capacity` is zero.
pub fn bounded<T>(capacity: usize, ordering: Ordering) -> Result<Queue<T>, ConfigurationError> {
  QueueConfig::new()
    .with_capacity(capacity)
    .with_ordering(ordering)
    .build()
}

/// Creates a queue without a capacity limit. Pushes never suspend.
pub fn unbounded<T>(ordering: Ordering) -> Queue<T> {
  Queue::from_parts(ordering, None)
}

// --- Shared State ---

struct State<T> {
  backlog: List<T>,
  closed: bool,
  // Fired when the backlog grows or the queue closes; wakes consumers.
  grew: Signal,
  // Fired when the backlog shrinks or the queue closes; wakes producers.
  shrank: Signal,
}

struct Shared<T> {
  ordering: Ordering,
  capacity: Option<usize>,
  state: Mutex<State<T>>,
}

impl<T> State<T> {
  #[inline]
  fn take(&mut self, ordering: Ordering) -> Option<T> {
    match ordering {
      Ordering::Fifo => self.backlog.shift(),
      Ordering::Lifo => self.backlog.pop(),
    }
  }
}

/// A handle to a closable, ordered, optionally-bounded queue.
///
/// Handles are cheap to clone; every clone refers to the same queue, so a
/// producer loop and a consumer loop can each hold one.
pub struct Queue<T> {
  shared: Arc<Shared<T>>,
  // Wake-up registration of this handle when it is polled as a `Stream`.
  slot: Slot,
}

impl<T> Queue<T> {
  /// Builds a queue from a [`QueueConfig`], validating it first.
  pub fn with_config(config: &QueueConfig) -> Result<Self, ConfigurationError> {
    config.validate()?;
    Ok(Self::from_parts(config.ordering, config.capacity))
  }

  fn from_parts(ordering: Ordering, capacity: Option<usize>) -> Self {
    tracing::debug!(%ordering, ?capacity, "creating queue");
    Self {
      shared: Arc::new(Shared {
        ordering,
        capacity,
        state: Mutex::new(State {
          backlog: List::new(),
          closed: false,
          grew: Signal::default(),
          shrank: Signal::default(),
        }),
      }),
      slot: None,
    }
  }

  /// Pushes `value` at the tail of the backlog.
  ///
  /// The returned future resolves to `true` once the value is enqueued, or to
  /// `false` if the queue is (or becomes) closed, in which case the value is
  /// dropped. On a bounded queue it waits while the backlog is full. Dropping
  /// the future before it resolves drops the value without enqueuing it.
  pub fn push(&self, value: T) -> Push<'_, T> {
    Push {
      queue: self,
      value: Some(value),
      slot: None,
    }
  }

  /// Attempts to push `value` without waiting. A rejected value is handed
  /// back inside the error.
  pub fn try_push(&self, value: T) -> Result<(), TryPushError<T>> {
    let mut state = self.shared.state.lock();
    if state.closed {
      return Err(TryPushError::Closed(value));
    }
    if self.is_full_locked(&state) {
      return Err(TryPushError::Full(value));
    }
    state.backlog.push(value);
    let wakers = state.grew.fire();
    drop(state);
    wake_all(wakers);
    Ok(())
  }

  /// Takes the next value according to the queue's ordering.
  ///
  /// The returned future resolves to `Some(value)` as soon as the backlog is
  /// non-empty, or to `None` once the queue is closed and drained. It waits
  /// while the queue is open and empty.
  pub fn next(&self) -> Next<'_, T> {
    Next {
      queue: self,
      slot: None,
    }
  }

  /// Attempts to take the next value without waiting.
  pub fn try_next(&self) -> Result<T, TryNextError> {
    let mut state = self.shared.state.lock();
    match state.take(self.shared.ordering) {
      Some(value) => {
        let wakers = state.shrank.fire();
        drop(state);
        wake_all(wakers);
        Ok(value)
      }
      None if state.closed => Err(TryNextError::Closed),
      None => Err(TryNextError::Empty),
    }
  }

  /// Closes the queue.
  ///
  /// Pending and future pushes resolve to `false`. Values already buffered
  /// are still delivered; iteration ends once they are drained. Returns
  /// `true` if this call closed the queue and `false` if it was already
  /// closed.
  pub fn close(&self) -> bool {
    let mut state = self.shared.state.lock();
    if state.closed {
      return false;
    }
    state.closed = true;
    tracing::debug!(backlog = state.backlog.len(), "queue closed");

    let mut wakers = state.grew.fire();
    wakers.extend(state.shrank.fire());
    drop(state);
    wake_all(wakers);
    true
  }

  /// Returns `true` once [`close`](Queue::close) has been called.
  pub fn is_closed(&self) -> bool {
    self.shared.state.lock().closed
  }

  /// Returns the number of buffered values.
  pub fn backlog(&self) -> usize {
    self.shared.state.lock().backlog.len()
  }

  /// Returns `true` if nothing is buffered.
  pub fn is_empty(&self) -> bool {
    self.backlog() == 0
  }

  /// Returns the capacity of a bounded queue, or `None` if it is unbounded.
  pub fn capacity(&self) -> Option<usize> {
    self.shared.capacity
  }

  /// Returns `true` if the queue has a capacity limit.
  pub fn is_bounded(&self) -> bool {
    self.shared.capacity.is_some()
  }

  /// Returns the removal order fixed at construction.
  pub fn ordering(&self) -> Ordering {
    self.shared.ordering
  }

  #[inline]
  fn is_full_locked(&self, state: &State<T>) -> bool {
    self
      .shared
      .capacity
      .is_some_and(|capacity| state.backlog.len() >= capacity)
  }

  // One push attempt. Hands the value back if the caller has to wait; the
  // task is then registered on `shrank` through `slot`.
  fn poll_push(&self, value: T, slot: &mut Slot, cx: &mut Context<'_>) -> Result<bool, T> {
    let mut state = self.shared.state.lock();
    if state.closed {
      tracing::trace!("push rejected, queue closed");
      state.shrank.unsubscribe(slot);
      return Ok(false);
    }
    if self.is_full_locked(&state) {
      tracing::trace!(backlog = state.backlog.len(), "producer waiting for capacity");
      state.shrank.subscribe(slot, cx.waker());
      return Err(value);
    }
    state.shrank.unsubscribe(slot);
    state.backlog.push(value);
    let wakers = state.grew.fire();
    drop(state);
    wake_all(wakers);
    Ok(true)
  }

  // One iteration step. Registers the task on `grew` through `slot` if it
  // has to wait.
  fn poll_take(&self, slot: &mut Slot, cx: &mut Context<'_>) -> Poll<Option<T>> {
    let mut state = self.shared.state.lock();
    if let Some(value) = state.take(self.shared.ordering) {
      state.grew.unsubscribe(slot);
      let wakers = state.shrank.fire();
      drop(state);
      wake_all(wakers);
      return Poll::Ready(Some(value));
    }
    if state.closed {
      state.grew.unsubscribe(slot);
      return Poll::Ready(None);
    }
    tracing::trace!("consumer waiting for a value");
    state.grew.subscribe(slot, cx.waker());
    Poll::Pending
  }

  // Withdraws a registration left by an operation that stopped waiting.
  fn abandon(&self, slot: &mut Slot, signal: fn(&mut State<T>) -> &mut Signal) {
    if slot.is_some() {
      let mut state = self.shared.state.lock();
      signal(&mut *state).unsubscribe(slot);
    }
  }
}

impl<T> Clone for Queue<T> {
  fn clone(&self) -> Self {
    Self {
      shared: self.shared.clone(),
      slot: None,
    }
  }
}

impl<T> Drop for Queue<T> {
  fn drop(&mut self) {
    let mut slot = self.slot.take();
    self.abandon(&mut slot, |state| &mut state.grew);
  }
}

impl<T> fmt::Debug for Queue<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let state = self.shared.state.lock();
    f.debug_struct("Queue")
      .field("ordering", &self.shared.ordering)
      .field("capacity", &self.shared.capacity)
      .field("backlog", &state.backlog.len())
      .field("closed", &state.closed)
      .field("waiting_consumers", &state.grew.len())
      .field("waiting_producers", &state.shrank.len())
      .finish()
  }
}

impl<T> Stream for Queue<T> {
  type Item = T;

  fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
    let this = self.get_mut();
    let mut slot = this.slot.take();
    let poll = this.poll_take(&mut slot, cx);
    this.slot = slot;
    poll
  }

  // Other handles may drain concurrently, so there is no lower bound.
  fn size_hint(&self) -> (usize, Option<usize>) {
    let state = self.shared.state.lock();
    if state.closed {
      (0, Some(state.backlog.len()))
    } else {
      (0, None)
    }
  }
}

impl<T> FusedStream for Queue<T> {
  fn is_terminated(&self) -> bool {
    let state = self.shared.state.lock();
    state.closed && state.backlog.is_empty()
  }
}

// --- Future Implementations ---

/// Future returned by [`Queue::push`].
#[must_use = "futures do nothing unless you .await or poll them"]
pub struct Push<'a, T> {
  queue: &'a Queue<T>,
  value: Option<T>,
  slot: Slot,
}

// The value is only ever moved, never pinned.
impl<T> Unpin for Push<'_, T> {}

impl<T> Future for Push<'_, T> {
  type Output = bool;

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    let this = self.get_mut();
    let value = this.value.take().expect("Push polled after completion");

    match this.queue.poll_push(value, &mut this.slot, cx) {
      Ok(pushed) => Poll::Ready(pushed),
      Err(value) => {
        this.value = Some(value);
        Poll::Pending
      }
    }
  }
}

impl<T> Drop for Push<'_, T> {
  fn drop(&mut self) {
    self.queue.abandon(&mut self.slot, |state| &mut state.shrank);
  }
}

impl<T> fmt::Debug for Push<'_, T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Push")
      .field("queue", self.queue)
      .field("pending", &self.value.is_some())
      .finish()
  }
}

/// Future returned by [`Queue::next`].
#[must_use = "futures do nothing unless you .await or poll them"]
pub struct Next<'a, T> {
  queue: &'a Queue<T>,
  slot: Slot,
}

impl<T> Future for Next<'_, T> {
  type Output = Option<T>;

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    let this = self.get_mut();
    this.queue.poll_take(&mut this.slot, cx)
  }
}

impl<T> Drop for Next<'_, T> {
  fn drop(&mut self) {
    self.queue.abandon(&mut self.slot, |state| &mut state.grew);
  }
}

impl<T> fmt::Debug for Next<'_, T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Next").field("queue", self.queue).finish()
  }
}
