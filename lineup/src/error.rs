// src/error.rs

use core::fmt;

use thiserror::Error;

/// Error returned when a queue is constructed from an invalid configuration.
///
/// Misconfiguration is fatal: construction fails immediately and nothing is
/// retried internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
  /// The requested ordering is not one of `fifo` or `lifo`.
  #[error("`ordering` should be one of `fifo` or `lifo`, got `{0}`")]
  InvalidOrdering(String),
  /// A bounded queue was requested with a capacity that is not a positive integer.
  #[error("`capacity` should be a positive integer")]
  InvalidCapacity,
}

// Implements `into_inner`, `Display` and `Error` for the value-carrying errors.
macro_rules! impl_error_for_enum_with_inner {
    (
        $enum_name:ident < $generic_param:ident >,
        $($variant:ident ( $message:expr ) ),+
        $(,)?
    ) => {
        impl<$generic_param> $enum_name<$generic_param> {
            /// Consumes the error, returning the rejected value.
            #[inline]
            pub fn into_inner(self) -> $generic_param {
                match self {
                    $( $enum_name::$variant(v) => v, )+
                }
            }
        }

        impl<$generic_param> fmt::Display for $enum_name<$generic_param> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $( $enum_name::$variant(_) => f.write_str($message), )+
                }
            }
        }

        impl<$generic_param> std::error::Error for $enum_name<$generic_param> {}
    };
}

/// Error returned by [`Queue::try_push`](crate::Queue::try_push) when the value
/// could not be enqueued immediately. The value is handed back.
#[derive(PartialEq, Eq, Clone)]
pub enum TryPushError<T> {
  /// The bounded backlog is at capacity.
  Full(T),
  /// The queue has been closed and accepts no further values.
  Closed(T),
}

impl<T> TryPushError<T> {
  /// Returns `true` if the push was rejected because the queue is full.
  pub fn is_full(&self) -> bool {
    matches!(self, TryPushError::Full(_))
  }

  /// Returns `true` if the push was rejected because the queue is closed.
  pub fn is_closed(&self) -> bool {
    matches!(self, TryPushError::Closed(_))
  }
}

impl<T> fmt::Debug for TryPushError<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TryPushError::Full(_) => write!(f, "TryPushError::Full(..)"),
      TryPushError::Closed(_) => write!(f, "TryPushError::Closed(..)"),
    }
  }
}

impl_error_for_enum_with_inner!(
  TryPushError<T>,
  Full("queue full"),
  Closed("queue closed"),
);

/// Error returned by [`Queue::try_next`](crate::Queue::try_next) when no value
/// could be taken immediately.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TryNextError {
  /// Nothing is buffered but the queue is still open.
  Empty,
  /// The queue is closed and fully drained.
  Closed,
}

impl std::error::Error for TryNextError {}
impl fmt::Display for TryNextError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TryNextError::Empty => write!(f, "queue empty"),
      TryNextError::Closed => write!(f, "queue closed and drained"),
    }
  }
}
