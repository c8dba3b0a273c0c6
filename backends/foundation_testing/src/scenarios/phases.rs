//! Workers advancing through phases in lockstep behind a `CyclicBarrier`.

use foundation_sync::{CyclicBarrier, Monitor};
use std::sync::Arc;
use std::thread;

/// Ordering problem found in a [`PhaseLog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PhaseViolation {
    /// Work for an earlier phase was recorded after work for a later one.
    #[display("PhaseViolation::OutOfOrder(index = {index}, phase = {phase}, previous = {previous})")]
    OutOfOrder {
        /// Position of the offending event in the log.
        index: usize,
        phase: usize,
        /// Phase of the event just before it.
        previous: usize,
    },

    /// A phase did not see exactly one event per worker.
    #[display("PhaseViolation::WrongCount(phase = {phase}, expected = {expected}, actual = {actual})")]
    WrongCount {
        phase: usize,
        expected: usize,
        actual: usize,
    },

    /// A worker recorded the same phase twice.
    #[display("PhaseViolation::DuplicateWorker(phase = {phase}, worker = {worker})")]
    DuplicateWorker { phase: usize, worker: usize },

    /// A phase was released by other than exactly one leader.
    #[display("PhaseViolation::LeaderCount(phase = {phase}, leaders = {leaders})")]
    LeaderCount { phase: usize, leaders: usize },
}

/// Global record of a [`run_phased_workers`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseLog {
    /// Participants per phase.
    pub workers: usize,
    /// Phases every worker went through.
    pub phases: usize,
    /// `(worker, phase)` in the order the work was recorded.
    pub events: Vec<(usize, usize)>,
    /// Leaders reported by the barrier, indexed by phase.
    pub leaders: Vec<usize>,
}

impl PhaseLog {
    /// Checks that no worker started a phase before every worker finished
    /// the previous one.
    ///
    /// # Errors
    ///
    /// Returns the first [`PhaseViolation`] found.
    pub fn validate(&self) -> Result<(), PhaseViolation> {
        for (index, pair) in self.events.windows(2).enumerate() {
            let (previous, phase) = (pair[0].1, pair[1].1);
            if phase < previous {
                return Err(PhaseViolation::OutOfOrder {
                    index: index + 1,
                    phase,
                    previous,
                });
            }
        }

        for phase in 0..self.phases {
            let mut seen = vec![false; self.workers];
            let mut actual = 0;
            for (worker, _) in self.events.iter().filter(|(_, p)| *p == phase) {
                actual += 1;
                match seen.get_mut(*worker) {
                    Some(slot) if !*slot => *slot = true,
                    _ => {
                        return Err(PhaseViolation::DuplicateWorker {
                            phase,
                            worker: *worker,
                        })
                    }
                }
            }
            if actual != self.workers {
                return Err(PhaseViolation::WrongCount {
                    phase,
                    expected: self.workers,
                    actual,
                });
            }

            let leaders = self.leaders.get(phase).copied().unwrap_or_default();
            if leaders != 1 {
                return Err(PhaseViolation::LeaderCount { phase, leaders });
            }
        }

        Ok(())
    }
}

/// Runs `workers` threads through `phases` phases separated by a shared
/// barrier.
///
/// Each worker records `(worker, phase)` into a shared log before arriving at
/// the barrier for that phase, so a correct barrier yields a log sorted by
/// phase.
///
/// # Examples
///
/// ```
/// use foundation_testing::scenarios::run_phased_workers;
///
/// let log = run_phased_workers(3, 2);
///
/// assert_eq!(log.events.len(), 6);
/// assert!(log.validate().is_ok());
/// ```
///
/// # Panics
///
/// Panics if `workers` is 0 or a worker thread panics.
#[must_use]
pub fn run_phased_workers(workers: usize, phases: usize) -> PhaseLog {
    let barrier = Arc::new(CyclicBarrier::new(workers));
    let events = Arc::new(Monitor::new(Vec::with_capacity(workers * phases)));
    let leaders = Arc::new(Monitor::new(vec![0usize; phases]));

    let handles: Vec<_> = (0..workers)
        .map(|worker| {
            let barrier = Arc::clone(&barrier);
            let events = Arc::clone(&events);
            let leaders = Arc::clone(&leaders);
            thread::spawn(move || {
                for phase in 0..phases {
                    events.with(|events| events.push((worker, phase)));

                    let result = barrier.arrive_and_wait();
                    if result.is_leader() {
                        leaders.with(|leaders| leaders[phase] += 1);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("phased worker panicked");
    }

    let log = PhaseLog {
        workers,
        phases,
        events: events.with(std::mem::take),
        leaders: leaders.with(std::mem::take),
    };
    tracing::debug!(workers, phases, "phased workers scenario finished");
    log
}
