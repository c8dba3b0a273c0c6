//! `CountingSemaphore` stress run.

use crate::stress::{StressConfig, StressHarness, StressResult};
use foundation_sync::CountingSemaphore;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Has every thread take a permit, do a little work and give it back.
///
/// An iteration fails if more than `permits` threads were inside the guarded
/// section at once.
///
/// # Examples
///
/// ```
/// use foundation_testing::stress::{StressConfig, sync::run_semaphore_stress};
///
/// let config = StressConfig::new().threads(8).iterations(200);
/// let result = run_semaphore_stress(config, 2);
///
/// assert_eq!(result.failures, 0);
/// ```
///
/// # Panics
///
/// Panics if `permits` is 0.
#[must_use]
pub fn run_semaphore_stress(config: StressConfig, permits: usize) -> StressResult {
    let semaphore = Arc::new(CountingSemaphore::new(permits, permits));
    let inside = Arc::new(AtomicUsize::new(0));

    StressHarness::new(config).run(move |_thread_id, _iteration| {
        let _permit = semaphore.permit();
        let now = inside.fetch_add(1, Ordering::AcqRel) + 1;
        std::thread::yield_now();
        inside.fetch_sub(1, Ordering::AcqRel);
        now <= permits
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ntest::timeout;

    #[test]
    #[timeout(30000)]
    fn test_semaphore_stress_bounds_holders() {
        let result = run_semaphore_stress(StressConfig::new().threads(8).iterations(500), 3);

        assert_eq!(result.total_operations(), 4000);
        assert_eq!(result.failures, 0);
    }
}
