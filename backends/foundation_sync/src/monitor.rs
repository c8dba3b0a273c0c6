//! A mutex and condition variable pair guarding a single unit of state.
//!
//! `Monitor` is the building block of every primitive in this crate. All
//! waiting goes through [`Monitor::wait_while`] (or a caller loop around
//! [`Monitor::wait`]) so that the guarded predicate is re-checked after each
//! wake-up.

use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError, TryLockError};

/// RAII guard returned by [`Monitor::lock`]; the lock is released on drop.
pub type MonitorGuard<'a, S> = MutexGuard<'a, S>;

/// State protected by a mutex plus the condition variable used to wait for
/// changes to that state.
///
/// Poisoning is recovered transparently: the primitives built on `Monitor`
/// never leave their state half-updated when user code runs, so a panic on
/// another thread does not make the state unusable.
///
/// # Examples
///
/// ```
/// use foundation_sync::Monitor;
/// use std::sync::Arc;
/// use std::thread;
///
/// let monitor = Arc::new(Monitor::new(false));
///
/// let waiter = {
///     let monitor = Arc::clone(&monitor);
///     thread::spawn(move || {
///         let ready = monitor.wait_while(monitor.lock(), |ready| !*ready);
///         assert!(*ready);
///     })
/// };
///
/// *monitor.lock() = true;
/// monitor.notify_all();
/// waiter.join().unwrap();
/// ```
pub struct Monitor<S> {
    /// The guarded state.
    state: Mutex<S>,

    /// Signalled whenever the state changes in a way waiters care about.
    condvar: Condvar,
}

impl<S: Default> Default for Monitor<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S> Monitor<S> {
    #[must_use]
    pub const fn new(state: S) -> Self {
        Self {
            state: Mutex::new(state),
            condvar: Condvar::new(),
        }
    }

    /// Acquires the lock, blocking the current thread until it is available.
    pub fn lock(&self) -> MonitorGuard<'_, S> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` against the state under the lock and returns its result.
    pub fn with<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let mut guard = self.lock();
        f(&mut *guard)
    }

    /// Releases the lock and suspends until notified, then re-acquires the lock.
    ///
    /// A single wait can return without the state having changed; callers
    /// must loop on their own predicate. Prefer [`Monitor::wait_while`].
    pub fn wait<'a>(&self, guard: MonitorGuard<'a, S>) -> MonitorGuard<'a, S> {
        self.condvar.wait(guard).unwrap_or_else(PoisonError::into_inner)
    }

    /// Suspends while `condition` returns `true`.
    ///
    /// `condition` is evaluated before the first wait and again after every
    /// wake-up; the returned guard is held with `condition` false.
    pub fn wait_while<'a, F>(
        &self,
        guard: MonitorGuard<'a, S>,
        mut condition: F,
    ) -> MonitorGuard<'a, S>
    where
        F: FnMut(&mut S) -> bool,
    {
        let mut guard = guard;
        while condition(&mut *guard) {
            trace!("Monitor: suspending until the state changes");
            guard = self.wait(guard);
        }
        guard
    }

    /// Wakes a single waiter.
    pub fn notify_one(&self) {
        self.condvar.notify_one();
    }

    /// Wakes every waiter.
    pub fn notify_all(&self) {
        self.condvar.notify_all();
    }

    pub fn into_inner(self) -> S {
        self.state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: fmt::Debug> fmt::Debug for Monitor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Monitor");
        match self.state.try_lock() {
            Ok(guard) => d.field("state", &&*guard),
            Err(TryLockError::Poisoned(ref e)) => d.field("state", &&**e.get_ref()),
            Err(TryLockError::WouldBlock) => d.field("state", &format_args!("<locked>")),
        };
        d.finish_non_exhaustive()
    }
}
