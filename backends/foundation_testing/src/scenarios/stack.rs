//! Concurrent push/pop against a shared `ConcurrentStack`.

use foundation_sync::ConcurrentStack;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

/// Outcome of [`run_push_pop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushPopReport {
    /// Values pushed across all pushers.
    pub pushes: usize,
    /// Pops that returned a value.
    pub successful_pops: usize,
    /// Pops that found the stack empty.
    pub failed_pops: usize,
    /// Length of the stack after every thread joined.
    pub final_len: usize,
}

impl PushPopReport {
    /// Every pushed value is either still on the stack or was popped exactly once.
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        self.pushes >= self.successful_pops
            && self.final_len == self.pushes - self.successful_pops
    }

    /// Total pop attempts, successful or not.
    #[must_use]
    pub const fn pop_attempts(&self) -> usize {
        self.successful_pops + self.failed_pops
    }
}

/// Runs `pushers` threads pushing and `poppers` threads popping concurrently,
/// each performing `ops_per_thread` operations.
///
/// Pops never wait for a value; an empty stack is counted as a failed pop.
///
/// # Examples
///
/// ```
/// use foundation_testing::scenarios::run_push_pop;
///
/// let report = run_push_pop(2, 2, 1000);
///
/// assert_eq!(report.pushes, 2000);
/// assert_eq!(report.pop_attempts(), 2000);
/// assert!(report.is_consistent());
/// ```
///
/// # Panics
///
/// Panics if a worker thread panics.
#[must_use]
pub fn run_push_pop(pushers: usize, poppers: usize, ops_per_thread: usize) -> PushPopReport {
    let stack = Arc::new(ConcurrentStack::new());
    let successful_pops = Arc::new(AtomicUsize::new(0));
    let failed_pops = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::with_capacity(pushers + poppers);

    for pusher in 0..pushers {
        let stack = Arc::clone(&stack);
        handles.push(thread::spawn(move || {
            for value in 0..ops_per_thread {
                stack.push((pusher, value));
            }
        }));
    }

    for _ in 0..poppers {
        let stack = Arc::clone(&stack);
        let successful_pops = Arc::clone(&successful_pops);
        let failed_pops = Arc::clone(&failed_pops);
        handles.push(thread::spawn(move || {
            for _ in 0..ops_per_thread {
                match stack.pop() {
                    Ok(_) => successful_pops.fetch_add(1, Ordering::Relaxed),
                    Err(_) => failed_pops.fetch_add(1, Ordering::Relaxed),
                };
            }
        }));
    }

    for handle in handles {
        handle.join().expect("push/pop worker panicked");
    }

    let report = PushPopReport {
        pushes: pushers * ops_per_thread,
        successful_pops: successful_pops.load(Ordering::Relaxed),
        failed_pops: failed_pops.load(Ordering::Relaxed),
        final_len: stack.len(),
    };
    tracing::debug!(?report, "push/pop scenario finished");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use ntest::timeout;

    /// WHY: Pops on an untouched stack must fail fast, not block
    /// WHAT: Poppers alone finish with every attempt counted as failed
    #[test]
    #[timeout(10000)]
    fn test_poppers_only_fail_fast() {
        let report = run_push_pop(0, 3, 100);

        assert_eq!(report.successful_pops, 0);
        assert_eq!(report.failed_pops, 300);
        assert_eq!(report.final_len, 0);
        assert!(report.is_consistent());
    }

    /// WHY: Pushes alone must all land
    /// WHAT: Final length equals the number of pushes
    #[test]
    #[timeout(10000)]
    fn test_pushers_only_keep_everything() {
        let report = run_push_pop(4, 0, 250);

        assert_eq!(report.final_len, 1000);
        assert!(report.is_consistent());
    }

    #[test]
    fn test_inconsistent_report_detected() {
        let report = PushPopReport {
            pushes: 10,
            successful_pops: 4,
            failed_pops: 0,
            final_len: 5,
        };
        assert!(!report.is_consistent());
    }
}
