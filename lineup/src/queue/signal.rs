// src/queue/signal.rs

//! A re-armable wake signal.
//!
//! Each waiting operation owns a [`Slot`] and registers its `Waker` through
//! it. Firing drains the whole waiter set at once, which re-arms the signal
//! with an empty one: every outstanding slot goes stale, and a waiter that
//! re-checks its predicate and still has to wait registers again. A waiter
//! that gives up (its future is dropped) unsubscribes its slot, so abandoned
//! waits do not pile up between firings.
//!
//! The signal performs no locking of its own. It lives inside the queue state
//! and is only touched while the queue lock is held, so a waiter can never
//! miss a firing that happens between its predicate check and its
//! registration. Wakers are handed back from `fire` so they can be woken once
//! the lock has been released.

use std::fmt;
use std::task::Waker;

use generational_arena::{Arena, Index};

/// A waiter's registration in a [`Signal`]. Empty until the first subscribe.
pub(crate) type Slot = Option<Index>;

#[derive(Default)]
pub(crate) struct Signal {
  waiters: Arena<Waker>,
}

impl Signal {
  /// Registers `waker` to be woken by the next firing. A slot that is still
  /// registered has its waker replaced in place.
  pub(crate) fn subscribe(&mut self, slot: &mut Slot, waker: &Waker) {
    if let Some(registered) = slot.and_then(|index| self.waiters.get_mut(index)) {
      if !registered.will_wake(waker) {
        registered.clone_from(waker);
      }
      return;
    }
    *slot = Some(self.waiters.insert(waker.clone()));
  }

  /// Drops the registration held by `slot`, if it has not fired yet.
  pub(crate) fn unsubscribe(&mut self, slot: &mut Slot) {
    if let Some(index) = slot.take() {
      self.waiters.remove(index);
    }
  }

  /// Takes every registered waker and re-arms the signal.
  ///
  /// Draining bumps the arena generation, so slots from before the firing
  /// never match a later registration.
  #[must_use = "the returned wakers must be woken"]
  pub(crate) fn fire(&mut self) -> Vec<Waker> {
    self.waiters.drain().map(|(_, waker)| waker).collect()
  }

  /// Number of wakers waiting for the next firing.
  pub(crate) fn len(&self) -> usize {
    self.waiters.len()
  }
}

impl fmt::Debug for Signal {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Signal").field("waiters", &self.waiters.len()).finish()
  }
}

/// Wakes every waker in `wakers`. Call this after releasing the queue lock.
#[inline]
pub(crate) fn wake_all(wakers: Vec<Waker>) {
  for waker in wakers {
    waker.wake();
  }
}
