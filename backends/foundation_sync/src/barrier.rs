//! Reusable multi-thread rendezvous built on a mutex and a condition variable.
//!
//! A barrier enables a fixed group of threads to synchronize the beginning of
//! each phase of some computation.

use std::fmt;

use crate::monitor::Monitor;

/// A cyclic barrier for a fixed number of participants.
///
/// Each participant calls [`CyclicBarrier::arrive_and_wait`] exactly once per
/// phase. The last arrival of a phase releases everyone else and returns
/// without blocking; the barrier is then ready for the next phase.
///
/// Misuse is not detected. Too few arrivals leave the waiters blocked forever;
/// too many arrivals let one phase's extra callers count towards the next
/// phase.
///
/// # Examples
///
/// ```
/// use foundation_sync::CyclicBarrier;
/// use std::sync::Arc;
/// use std::thread;
///
/// let barrier = Arc::new(CyclicBarrier::new(3));
///
/// let mut handles = vec![];
/// for id in 0..3 {
///     let barrier = Arc::clone(&barrier);
///     handles.push(thread::spawn(move || {
///         println!("Phase 1 - Thread {id}");
///         barrier.arrive_and_wait();
///
///         println!("Phase 2 - Thread {id}");
///         barrier.arrive_and_wait();
///     }));
/// }
///
/// for handle in handles {
///     handle.join().unwrap();
/// }
/// assert_eq!(barrier.phase(), 2);
/// ```
pub struct CyclicBarrier {
    state: Monitor<BarrierState>,
    expected: usize,
}

struct BarrierState {
    /// Participants that reached the current phase.
    arrived: usize,

    /// Advances, wrapping, every time a phase is released.
    phase: usize,
}

/// Result returned from [`CyclicBarrier::arrive_and_wait`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarrierWaitResult {
    is_leader: bool,
    phase: usize,
}

impl BarrierWaitResult {
    /// Returns `true` if this thread was the last to arrive and released the phase.
    #[inline]
    #[must_use]
    pub fn is_leader(&self) -> bool {
        self.is_leader
    }

    /// The phase this thread arrived in.
    #[inline]
    #[must_use]
    pub fn phase(&self) -> usize {
        self.phase
    }
}

impl CyclicBarrier {
    /// Creates a barrier for `expected` participants per phase.
    ///
    /// # Panics
    ///
    /// Panics if `expected` is 0.
    #[must_use]
    pub fn new(expected: usize) -> Self {
        assert!(expected > 0, "barrier count must be > 0");
        Self {
            state: Monitor::new(BarrierState {
                arrived: 0,
                phase: 0,
            }),
            expected,
        }
    }

    /// Blocks the current thread until all participants of this phase have arrived.
    ///
    /// Waiters are released once the phase number differs from the one they
    /// arrived in. A waiter descheduled across several releases still
    /// observes the change and proceeds, even though it skipped the
    /// intermediate phases.
    pub fn arrive_and_wait(&self) -> BarrierWaitResult {
        let mut state = self.state.lock();
        let arrival_phase = state.phase;
        state.arrived += 1;

        if state.arrived == self.expected {
            state.arrived = 0;
            state.phase = state.phase.wrapping_add(1);
            drop(state);

            debug!(
                phase = arrival_phase,
                expected = self.expected,
                "CyclicBarrier: phase released"
            );
            self.state.notify_all();

            return BarrierWaitResult {
                is_leader: true,
                phase: arrival_phase,
            };
        }

        let state = self
            .state
            .wait_while(state, |state| state.phase == arrival_phase);
        drop(state);

        BarrierWaitResult {
            is_leader: false,
            phase: arrival_phase,
        }
    }

    /// Number of participants per phase.
    #[must_use]
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Participants that have arrived in the current phase so far.
    #[must_use]
    pub fn arrived(&self) -> usize {
        self.state.with(|state| state.arrived)
    }

    /// Number of phases released so far, wrapping on overflow.
    #[must_use]
    pub fn phase(&self) -> usize {
        self.state.with(|state| state.phase)
    }
}

impl fmt::Debug for CyclicBarrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (arrived, phase) = self.state.with(|state| (state.arrived, state.phase));
        f.debug_struct("CyclicBarrier")
            .field("expected", &self.expected)
            .field("arrived", &arrived)
            .field("phase", &phase)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ntest::timeout;
    use serial_test::serial;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    /// WHY: Validates barrier panics on zero count
    /// WHAT: Creating barrier with 0 participants should panic
    #[test]
    #[should_panic(expected = "barrier count must be > 0")]
    fn test_new_zero_panics() {
        let _ = CyclicBarrier::new(0);
    }

    /// WHY: Validates single participant barrier
    /// WHAT: Barrier with n=1 never blocks and leads every phase
    #[test]
    #[timeout(1000)]
    fn test_single_participant_is_reusable() {
        let barrier = CyclicBarrier::new(1);

        let first = barrier.arrive_and_wait();
        assert!(first.is_leader());
        assert_eq!(first.phase(), 0);

        let second = barrier.arrive_and_wait();
        assert!(second.is_leader());
        assert_eq!(second.phase(), 1);

        assert_eq!(barrier.phase(), 2);
        assert_eq!(barrier.arrived(), 0);
    }

    /// WHY: Nobody may pass until the last participant arrives
    /// WHAT: Two early arrivals stay blocked until the third shows up
    #[test]
    #[serial]
    #[timeout(10000)]
    fn test_waiters_block_until_last_arrival() {
        let barrier = Arc::new(CyclicBarrier::new(3));
        let passed = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let barrier = Arc::clone(&barrier);
                let passed = Arc::clone(&passed);
                thread::spawn(move || {
                    let result = barrier.arrive_and_wait();
                    passed.fetch_add(1, Ordering::AcqRel);
                    result
                })
            })
            .collect();

        while barrier.arrived() < 2 {
            thread::yield_now();
        }
        thread::sleep(Duration::from_millis(50));
        assert_eq!(passed.load(Ordering::Acquire), 0);

        let last = barrier.arrive_and_wait();
        assert!(last.is_leader());

        for handle in handles {
            let result = handle.join().unwrap();
            assert!(!result.is_leader());
            assert_eq!(result.phase(), 0);
        }
        assert_eq!(passed.load(Ordering::Acquire), 2);
    }

    /// WHY: The barrier must be reusable with exactly one leader per phase
    /// WHAT: 4 threads x 50 phases produce 50 leaders and advance the phase 50 times
    #[test]
    #[timeout(30000)]
    fn test_one_leader_per_phase() {
        const PARTICIPANTS: usize = 4;
        const PHASES: usize = 50;

        let barrier = Arc::new(CyclicBarrier::new(PARTICIPANTS));
        let leaders = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..PARTICIPANTS)
            .map(|_| {
                let barrier = Arc::clone(&barrier);
                let leaders = Arc::clone(&leaders);
                thread::spawn(move || {
                    for expected_phase in 0..PHASES {
                        let result = barrier.arrive_and_wait();
                        assert_eq!(result.phase(), expected_phase);
                        if result.is_leader() {
                            leaders.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(leaders.load(Ordering::Relaxed), PHASES);
        assert_eq!(barrier.phase(), PHASES);
    }

    /// WHY: Extra arrivals count towards the next phase and a waiter that
    /// sleeps through several releases must still leave
    /// WHAT: A phase-0 waiter survives two releases and reports phase 0
    #[test]
    #[serial]
    #[timeout(10000)]
    fn test_waiter_survives_skipped_phases() {
        let barrier = Arc::new(CyclicBarrier::new(2));

        let waiter = {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || barrier.arrive_and_wait())
        };
        while barrier.arrived() < 1 {
            thread::yield_now();
        }

        // Releases phase 0; the waiter may still be parked afterwards.
        let first = barrier.arrive_and_wait();
        assert!(first.is_leader());
        assert_eq!(first.phase(), 0);

        // Over-arrival: these two count towards phase 1 and release it.
        let extra = {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || barrier.arrive_and_wait())
        };
        let second = barrier.arrive_and_wait();
        let extra = extra.join().unwrap();

        assert_eq!(second.phase(), 1);
        assert_eq!(extra.phase(), 1);
        assert_ne!(second.is_leader(), extra.is_leader());

        let waited = waiter.join().unwrap();
        assert!(!waited.is_leader());
        assert_eq!(waited.phase(), 0);
        assert_eq!(barrier.phase(), 2);
        assert_eq!(barrier.arrived(), 0);
    }

    /// WHY: Validates Debug implementation
    /// WHAT: Debug formatting should show counts
    #[test]
    fn test_debug() {
        let barrier = CyclicBarrier::new(3);
        let debug = format!("{barrier:?}");
        assert!(debug.contains("CyclicBarrier"));
        assert!(debug.contains("expected: 3"));
        assert!(debug.contains("phase: 0"));
    }
}
