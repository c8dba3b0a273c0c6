//! Error types returned by the primitives.
//!
//! Only the stack and the semaphore can fail. Queue and barrier calls either
//! block or succeed.

use core::convert::Infallible;
use core::fmt;

pub type StackResult<T, E = Infallible> = Result<T, StackError<E>>;

/// Failure of a [`crate::ConcurrentStack`] pop.
///
/// `E` is the error of a caller supplied materializer (see
/// [`crate::ConcurrentStack::pop_with`]) and defaults to [`Infallible`] for
/// the plain pop operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackError<E = Infallible> {
    /// The stack held no elements when the pop was attempted.
    Empty,

    /// Building the outgoing value failed; the stack was left unmodified.
    Materialize(E),
}

impl<E> StackError<E> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, StackError::Empty)
    }
}

impl<E: fmt::Display> fmt::Display for StackError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackError::Empty => write!(f, "StackError::Empty"),
            StackError::Materialize(err) => write!(f, "StackError::Materialize({err})"),
        }
    }
}

impl<E: core::error::Error + 'static> core::error::Error for StackError<E> {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            StackError::Empty => None,
            StackError::Materialize(err) => Some(err),
        }
    }
}

pub type SemaphoreResult<T> = Result<T, SemaphoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SemaphoreError {
    /// A release was attempted while every permit was already available.
    #[display("SemaphoreError::Overflow(max = {max})")]
    Overflow { max: usize },
}
