//! Mutex guarded LIFO container.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::errors::{StackError, StackResult};

/// A thread-safe LIFO stack.
///
/// Every operation holds the stack's single lock for its whole duration, so
/// `len` and `is_empty` are consistent snapshots. Popping never blocks: an
/// empty stack fails immediately with [`StackError::Empty`] and retry policy is
/// left to the caller.
///
/// # Examples
///
/// ```
/// use foundation_sync::{ConcurrentStack, StackError};
///
/// let stack = ConcurrentStack::new();
/// stack.push(1);
/// stack.push(2);
///
/// assert_eq!(stack.pop(), Ok(2));
///
/// let mut slot = 0;
/// stack.pop_into(&mut slot).unwrap();
/// assert_eq!(slot, 1);
///
/// assert!(stack.is_empty());
/// assert_eq!(stack.pop(), Err(StackError::Empty));
/// ```
pub struct ConcurrentStack<T> {
    /// Top of the stack is the end of the vector.
    items: Mutex<Vec<T>>,
}

impl<T> Default for ConcurrentStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for ConcurrentStack<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: Mutex::new(iter.into_iter().collect()),
        }
    }
}

/// Copies the source under its own lock only.
///
/// The copy never touches a second stack's lock, so two threads cloning two
/// stacks into each other cannot deadlock. Code that locks two stacks at once
/// through other means must agree on a fixed acquisition order.
impl<T: Clone> Clone for ConcurrentStack<T> {
    fn clone(&self) -> Self {
        let items = Vec::clone(&self.lock());
        Self {
            items: Mutex::new(items),
        }
    }
}

impl<T> ConcurrentStack<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Pushes `value` as the new top. Never blocks on anything but the lock.
    pub fn push(&self, value: T) {
        self.lock().push(value);
    }

    /// Removes and returns the top element.
    ///
    /// # Errors
    ///
    /// Returns [`StackError::Empty`] immediately if the stack holds nothing.
    pub fn pop(&self) -> StackResult<T> {
        self.lock().pop().ok_or(StackError::Empty)
    }

    /// Removes the top element and moves it into `slot`.
    ///
    /// The previous value of `slot` is dropped after the lock is released.
    ///
    /// # Errors
    ///
    /// Returns [`StackError::Empty`] immediately if the stack holds nothing;
    /// `slot` is left untouched.
    pub fn pop_into(&self, slot: &mut T) -> StackResult<()> {
        let top = self.pop()?;
        *slot = top;
        Ok(())
    }

    /// Builds an outgoing value from the top element and only then removes it.
    ///
    /// `materialize` runs under the lock with a shared reference to the top
    /// element. If it fails, the stack is left exactly as it was and the
    /// caller may retry. On success the top element is removed and dropped
    /// once the lock has been released.
    ///
    /// # Errors
    ///
    /// Returns [`StackError::Empty`] if the stack holds nothing, or
    /// [`StackError::Materialize`] carrying the materializer's error.
    ///
    /// # Examples
    ///
    /// ```
    /// use foundation_sync::ConcurrentStack;
    ///
    /// let stack = ConcurrentStack::new();
    /// stack.push(vec![42u8; 1024]);
    ///
    /// let copy = stack
    ///     .pop_with(|values: &Vec<u8>| {
    ///         let mut copy = Vec::new();
    ///         copy.try_reserve_exact(values.len())?;
    ///         copy.extend_from_slice(values);
    ///         Ok::<_, std::collections::TryReserveError>(copy)
    ///     })
    ///     .unwrap();
    ///
    /// assert_eq!(copy.len(), 1024);
    /// assert!(stack.is_empty());
    /// ```
    pub fn pop_with<U, E, F>(&self, materialize: F) -> StackResult<U, E>
    where
        F: FnOnce(&T) -> Result<U, E>,
    {
        let mut items = self.lock();
        let top = items.last().ok_or(StackError::<E>::Empty)?;
        let value = materialize(top).map_err(StackError::Materialize)?;
        let removed = items.pop();
        drop(items);
        drop(removed);
        Ok(value)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Consumes the stack, returning its elements bottom first.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.items
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> fmt::Debug for ConcurrentStack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrentStack")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
