// src/queue/config.rs

//! Declarative queue construction.
//!
//! With the `serde` feature, both [`Ordering`] and [`QueueConfig`] can be
//! loaded from any serde format. An unknown ordering string is rejected with
//! the [`ConfigurationError`] message.

use core::fmt;
use std::str::FromStr;

use super::Queue;
use crate::error::ConfigurationError;

/// Which end of the backlog a consumer takes from.
///
/// Pushes always append at the tail; only removal is affected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
  feature = "serde",
  derive(serde::Serialize, serde::Deserialize),
  serde(rename_all = "lowercase", try_from = "String")
)]
pub enum Ordering {
  /// Oldest first: consumers take from the head.
  #[default]
  Fifo,
  /// Most recent first: consumers take from the tail.
  Lifo,
}

impl Ordering {
  /// The lowercase name of this ordering.
  pub fn as_str(&self) -> &'static str {
    match self {
      Ordering::Fifo => "fifo",
      Ordering::Lifo => "lifo",
    }
  }
}

impl fmt::Display for Ordering {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Ordering {
  type Err = ConfigurationError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("fifo") {
      Ok(Ordering::Fifo)
    } else if s.eq_ignore_ascii_case("lifo") {
      Ok(Ordering::Lifo)
    } else {
      Err(ConfigurationError::InvalidOrdering(s.to_string()))
    }
  }
}

impl TryFrom<String> for Ordering {
  type Error = ConfigurationError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

/// Settings a [`Queue`] is built from. Defaults to an unbounded FIFO queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
  feature = "serde",
  derive(serde::Serialize, serde::Deserialize),
  serde(default, deny_unknown_fields)
)]
pub struct QueueConfig {
  /// Maximum backlog size. `None` means unbounded.
  pub capacity: Option<usize>,
  /// Removal order.
  pub ordering: Ordering,
}

impl QueueConfig {
  /// An unbounded FIFO configuration.
  pub fn new() -> Self {
    Self::default()
  }

  /// Sets a maximum backlog size.
  pub fn with_capacity(mut self, capacity: usize) -> Self {
    self.capacity = Some(capacity);
    self
  }

  /// Removes any maximum backlog size.
  pub fn unbounded(mut self) -> Self {
    self.capacity = None;
    self
  }

  /// Sets the removal order.
  pub fn with_ordering(mut self, ordering: Ordering) -> Self {
    self.ordering = ordering;
    self
  }

  /// Checks the configuration without building a queue.
  pub fn validate(&self) -> Result<(), ConfigurationError> {
    match self.capacity {
      Some(0) => Err(ConfigurationError::InvalidCapacity),
      _ => Ok(()),
    }
  }

  /// Builds a queue from this configuration.
  pub fn build<T>(&self) -> Result<Queue<T>, ConfigurationError> {
    Queue::with_config(self)
  }
}
