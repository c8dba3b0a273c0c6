//! `CyclicBarrier` stress run.

use crate::stress::{StressConfig, StressHarness, StressResult};
use foundation_sync::CyclicBarrier;
use std::sync::Arc;

/// Drives every thread through one barrier phase per iteration.
///
/// An iteration succeeds when the phase reported by the barrier matches the
/// iteration number, i.e. no thread ever ran ahead into a later phase.
///
/// All threads must keep arriving for the others to be released, so any
/// duration in `config` is ignored.
///
/// # Examples
///
/// ```
/// use foundation_testing::stress::{StressConfig, sync::run_barrier_stress};
///
/// let config = StressConfig::new().threads(4).iterations(100);
/// let result = run_barrier_stress(config);
///
/// assert_eq!(result.successes, 400);
/// ```
#[must_use]
pub fn run_barrier_stress(config: StressConfig) -> StressResult {
    let config = config.without_duration();
    let barrier = Arc::new(CyclicBarrier::new(config.get_thread_count()));

    StressHarness::new(config).run(move |_thread_id, iteration| {
        barrier.arrive_and_wait().phase() == iteration
    })
}
