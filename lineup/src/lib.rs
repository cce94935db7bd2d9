//! A closable, ordered, optionally-bounded async queue for Rust.
//!
//! Lineup decouples a producer loop from a consumer loop without a thread pool
//! or a particular runtime. A [`Queue`] delivers values FIFO or LIFO, applies
//! backpressure when bounded, and shuts down gracefully: once closed it
//! rejects new values but still drains what it has buffered.
//!
//! The backlog is a [`List`], an arena-backed doubly-linked list with O(1)
//! push/pop at both ends and O(1) removal or splice-insertion at any node.

pub mod error;
pub mod list;
pub mod queue;

pub use error::{ConfigurationError, TryNextError, TryPushError};
pub use list::{Direction, List, NodeKey, NodeRef, Nodes};
pub use queue::{bounded, unbounded, Next, Ordering, Push, Queue, QueueConfig};

// Helper function to check if a type is Send + Sync.
#[allow(dead_code)]
fn assert_send_sync<T: Send + Sync>() {}

#[allow(dead_code)]
fn assert_queue_is_send_sync() {
  assert_send_sync::<Queue<String>>();
  assert_send_sync::<List<String>>();
}
