//! Counting semaphore on top of [`Monitor`].

use std::fmt;

use crate::errors::{SemaphoreError, SemaphoreResult};
use crate::monitor::Monitor;

/// A counting semaphore holding between `0` and `max` permits.
///
/// # Examples
///
/// ```
/// use foundation_sync::CountingSemaphore;
/// use std::sync::Arc;
/// use std::thread;
///
/// // at most three workers run at once
/// let semaphore = Arc::new(CountingSemaphore::new(3, 10));
///
/// let handles: Vec<_> = (0..5)
///     .map(|id| {
///         let semaphore = Arc::clone(&semaphore);
///         thread::spawn(move || {
///             let _permit = semaphore.permit();
///             println!("Thread {id} working...");
///         })
///     })
///     .collect();
///
/// for handle in handles {
///     handle.join().unwrap();
/// }
/// assert_eq!(semaphore.available(), 3);
/// ```
pub struct CountingSemaphore {
    available: Monitor<usize>,
    max: usize,
}

impl CountingSemaphore {
    /// Creates a semaphore with `initial` permits available out of `max`.
    ///
    /// # Panics
    ///
    /// Panics if `max` is 0 or `initial` exceeds `max`.
    #[must_use]
    pub fn new(initial: usize, max: usize) -> Self {
        assert!(max > 0, "semaphore max must be > 0");
        assert!(initial <= max, "semaphore initial count must not exceed max");
        Self {
            available: Monitor::new(initial),
            max,
        }
    }

    /// Takes a permit, blocking while none is available.
    pub fn acquire(&self) {
        let mut available = self.available.wait_while(self.available.lock(), |available| {
            *available == 0
        });
        *available -= 1;
    }

    /// Takes a permit if one is available, without blocking.
    #[must_use]
    pub fn try_acquire(&self) -> bool {
        self.available.with(|available| {
            if *available == 0 {
                return false;
            }
            *available -= 1;
            true
        })
    }

    /// Returns a permit and wakes one waiter.
    ///
    /// # Errors
    ///
    /// Returns [`SemaphoreError::Overflow`] if all `max` permits are already
    /// available; the count is left unchanged.
    pub fn release(&self) -> SemaphoreResult<()> {
        let mut available = self.available.lock();
        if *available >= self.max {
            return Err(SemaphoreError::Overflow { max: self.max });
        }
        *available += 1;
        drop(available);

        self.available.notify_one();
        Ok(())
    }

    /// Takes a permit, blocking while none is available, and returns it when
    /// the guard drops.
    pub fn permit(&self) -> SemaphorePermit<'_> {
        self.acquire();
        SemaphorePermit { semaphore: self }
    }

    /// Like [`CountingSemaphore::permit`] but returns `None` instead of blocking.
    pub fn try_permit(&self) -> Option<SemaphorePermit<'_>> {
        self.try_acquire()
            .then(|| SemaphorePermit { semaphore: self })
    }

    #[must_use]
    pub fn available(&self) -> usize {
        *self.available.lock()
    }

    #[must_use]
    pub fn max_permits(&self) -> usize {
        self.max
    }
}

impl fmt::Debug for CountingSemaphore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountingSemaphore")
            .field("available", &self.available())
            .field("max", &self.max)
            .finish()
    }
}

/// RAII permit from [`CountingSemaphore::permit`].
#[must_use = "the permit is returned as soon as it is dropped"]
pub struct SemaphorePermit<'a> {
    semaphore: &'a CountingSemaphore,
}

impl Drop for SemaphorePermit<'_> {
    fn drop(&mut self) {
        // Overflow here means a stray release() already restored this permit.
        if let Err(err) = self.semaphore.release() {
            debug!(%err, "SemaphorePermit: returned permit overflowed the semaphore");
        }
    }
}

impl fmt::Debug for SemaphorePermit<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SemaphorePermit").finish_non_exhaustive()
    }
}
